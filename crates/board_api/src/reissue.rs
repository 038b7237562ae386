use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;

use crate::config::BoardApiConfig;
use crate::error::{parse_error_message, BoardApiError};
use crate::headers::HEADER_ACCESS;
use crate::url::{join_api_url, REISSUE_PATH};

/// Classification of the marker bodies the backend's JWT filter writes
/// alongside an unauthorized status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInvalidMarker {
    /// The access token is stale or rejected; a reissue is worth attempting.
    AccessToken,
    /// The refresh credential itself is gone; a reissue cannot succeed.
    RefreshToken,
}

fn access_marker_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)access.?token.?expired|invalid.?access.?token")
            .expect("access marker regex must compile")
    })
}

fn refresh_marker_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)refresh.?token.?expired|invalid.?refresh.?token")
            .expect("refresh marker regex must compile")
    })
}

/// Matches an unauthorized response body against the known marker set.
///
/// Bodies outside the set return `None`; the interceptor treats those the
/// same as an access-token marker and attempts a reissue.
#[must_use]
pub fn classify_session_invalid(body: &str) -> Option<SessionInvalidMarker> {
    if refresh_marker_regex().is_match(body) {
        return Some(SessionInvalidMarker::RefreshToken);
    }
    if access_marker_regex().is_match(body) {
        return Some(SessionInvalidMarker::AccessToken);
    }
    None
}

/// Exchanges the httponly refresh cookie for a new access token.
///
/// The reissue call deliberately carries no bearer header; replaying the
/// stale access token here would come back unauthorized again and loop. The
/// cookie jar on `http` supplies the refresh credential out of band.
pub async fn reissue_access_token(
    http: &Client,
    config: &BoardApiConfig,
) -> Result<String, BoardApiError> {
    let url = join_api_url(&config.base_url, REISSUE_PATH);
    let response = http.post(url).send().await.map_err(|source| {
        BoardApiError::ReissueFailed {
            status: None,
            message: format!("reissue transport failure: {source}"),
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BoardApiError::ReissueFailed {
            status: Some(status),
            message: parse_error_message(status, &body),
        });
    }

    response
        .headers()
        .get(HEADER_ACCESS)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or(BoardApiError::ReissueFailed {
            status: Some(status),
            message: "reissue response carried no access header".to_owned(),
        })
}
