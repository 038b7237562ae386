use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use session_store::{Session, TokenStore};

use crate::config::BoardApiConfig;
use crate::error::{parse_error_message, BoardApiError};
use crate::headers::{build_headers, token_expiry_epoch_ms, token_member_id, HEADER_ACCESS};
use crate::navigate::{Destination, Navigate};
use crate::pending::{MultipartField, PendingRequest};
use crate::reissue::{classify_session_invalid, reissue_access_token, SessionInvalidMarker};
use crate::url::join_api_url;

/// Observer notified of session changes the interceptor makes on its own.
///
/// The session lifecycle uses this to re-arm its expiry timer against a
/// refreshed token, and to stand the timer down when the interceptor ends
/// the session after an irrecoverable reissue. A timer left armed against a
/// torn-down session would fire a second, spurious logout later.
pub trait RefreshObserver: Send + Sync {
    fn token_refreshed(&self, session: &Session);

    fn session_ended(&self) {}
}

/// Buffered response handed back to callers.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Freshly issued access token, when the server attached one.
    pub access_token: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BoardApiError> {
        serde_json::from_slice(&self.body).map_err(BoardApiError::from)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Authenticated board API client.
///
/// Every request runs through the reissue-and-retry state machine: the
/// current token is attached on dispatch, one unauthorized response buys
/// exactly one reissue attempt plus one replay, and an irrecoverable reissue
/// ends the session through the [`Navigate`] seam. Transport errors and
/// non-authorization statuses pass through to the caller unchanged.
pub struct BoardApiClient {
    http: Client,
    config: BoardApiConfig,
    tokens: Arc<TokenStore>,
    navigator: Arc<dyn Navigate>,
    refresh_observer: Option<Arc<dyn RefreshObserver>>,
}

impl BoardApiClient {
    pub fn new(
        config: BoardApiConfig,
        tokens: Arc<TokenStore>,
        navigator: Arc<dyn Navigate>,
    ) -> Result<Self, BoardApiError> {
        // The cookie jar carries the httponly refresh credential between the
        // login response and later reissue calls.
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BoardApiError::from)?;

        Ok(Self {
            http,
            config,
            tokens,
            navigator,
            refresh_observer: None,
        })
    }

    #[must_use]
    pub fn with_refresh_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.refresh_observer = Some(observer);
        self
    }

    #[must_use]
    pub fn config(&self) -> &BoardApiConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Absolute URL for an API path under the configured base.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        join_api_url(&self.config.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, BoardApiError> {
        self.execute(PendingRequest::new(Method::GET, self.api_url(path)))
            .await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, BoardApiError> {
        let query = query
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect();
        self.execute(PendingRequest::new(Method::GET, self.api_url(path)).with_query(query))
            .await
    }

    pub async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, BoardApiError> {
        let body = serde_json::to_value(body)?;
        self.execute(PendingRequest::new(Method::POST, self.api_url(path)).with_json(body))
            .await
    }

    pub async fn put_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, BoardApiError> {
        let body = serde_json::to_value(body)?;
        self.execute(PendingRequest::new(Method::PUT, self.api_url(path)).with_json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, BoardApiError> {
        self.execute(PendingRequest::new(Method::DELETE, self.api_url(path)))
            .await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: Vec<MultipartField>,
    ) -> Result<ApiResponse, BoardApiError> {
        self.execute(PendingRequest::new(Method::POST, self.api_url(path)).with_multipart(fields))
            .await
    }

    /// Runs one captured request through the authorization state machine.
    pub async fn execute(&self, mut pending: PendingRequest) -> Result<ApiResponse, BoardApiError> {
        let response = self.dispatch(&pending).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return finish(response);
        }

        if !pending.begin_retry() {
            // Already replayed once; a second reissue cycle is never entered.
            return Err(BoardApiError::Status(
                response.status,
                parse_error_message(response.status, &response.text()),
            ));
        }

        let body = response.text();
        if classify_session_invalid(&body) == Some(SessionInvalidMarker::RefreshToken) {
            log::warn!("unauthorized response names the refresh credential; skipping reissue");
            return Err(self.force_logout());
        }

        match reissue_access_token(&self.http, &self.config).await {
            Ok(token) => match self.adopt_reissued_token(&token) {
                Ok(_session) => {
                    log::debug!("access token reissued; replaying original request");
                    let retried = self.dispatch(&pending).await?;
                    finish(retried)
                }
                Err(error) => {
                    log::warn!("reissued token could not be adopted: {error}");
                    Err(self.force_logout())
                }
            },
            Err(error) => {
                log::warn!("token reissue failed: {error}");
                Err(self.force_logout())
            }
        }
    }

    /// Sends `pending` once with the current token attached, buffering the
    /// response.
    async fn dispatch(&self, pending: &PendingRequest) -> Result<ApiResponse, BoardApiError> {
        let token = self.tokens.access_token();
        let headers = build_headers(&self.config, token.as_deref());
        let builder = pending.to_request_builder(&self.http, &headers)?;

        let response = builder.send().await.map_err(BoardApiError::from)?;
        let status = response.status();
        let access_token = response
            .headers()
            .get(HEADER_ACCESS)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(BoardApiError::from)?.to_vec();

        Ok(ApiResponse {
            status,
            access_token,
            body,
        })
    }

    /// Stores the reissued token as the new session, carrying member
    /// metadata over from the replaced one, and notifies the observer.
    fn adopt_reissued_token(&self, token: &str) -> Result<Session, BoardApiError> {
        let expires_at = token_expiry_epoch_ms(token).ok_or_else(|| {
            BoardApiError::MalformedToken("reissued token has no decodable exp claim".to_owned())
        })?;

        let previous = self.tokens.get();
        let mut session = Session::new(token, expires_at);
        session.member_id =
            token_member_id(token).or(previous.as_ref().and_then(|prior| prior.member_id));
        session.nickname = previous.and_then(|prior| prior.nickname);

        self.tokens.set(session.clone())?;
        if let Some(observer) = &self.refresh_observer {
            observer.token_refreshed(&session);
        }
        Ok(session)
    }

    /// Ends the session after an irrecoverable reissue: clears the store
    /// and, outside exempt destinations, surfaces the session-expired notice
    /// and redirects to login. Returns the rejection handed to the caller;
    /// nothing here panics past the interceptor boundary.
    fn force_logout(&self) -> BoardApiError {
        if let Err(error) = self.tokens.clear() {
            log::warn!("failed to clear session store during forced logout: {error}");
        }

        if let Some(observer) = &self.refresh_observer {
            observer.session_ended();
        }

        if !self.navigator.current().is_reissue_exempt() {
            self.navigator.notify_session_expired();
            self.navigator.redirect(Destination::Login);
        }

        BoardApiError::SessionExpired
    }
}

fn finish(response: ApiResponse) -> Result<ApiResponse, BoardApiError> {
    if response.status.is_success() {
        Ok(response)
    } else {
        Err(BoardApiError::Status(
            response.status,
            parse_error_message(response.status, &response.text()),
        ))
    }
}
