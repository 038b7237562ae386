use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;
use session_store::SessionStoreError;

#[derive(Debug)]
pub enum BoardApiError {
    InvalidBaseUrl(String),
    InvalidMultipartField(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Serde(JsonError),
    MalformedToken(String),
    ReissueFailed {
        status: Option<StatusCode>,
        message: String,
    },
    SessionExpired,
    Store(SessionStoreError),
}

impl fmt::Display for BoardApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidMultipartField(message) => {
                write!(f, "invalid multipart field: {message}")
            }
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::MalformedToken(message) => write!(f, "malformed access token: {message}"),
            Self::ReissueFailed { status, message } => {
                let status = status
                    .map(|status| status.as_u16().to_string())
                    .unwrap_or_else(|| "n/a".to_owned());
                write!(f, "token reissue failed (status: {status}): {message}")
            }
            Self::SessionExpired => write!(f, "session expired; login required"),
            Self::Store(error) => write!(f, "session store error: {error}"),
        }
    }
}

impl std::error::Error for BoardApiError {}

impl From<reqwest::Error> for BoardApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for BoardApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

impl From<SessionStoreError> for BoardApiError {
    fn from(error: SessionStoreError) -> Self {
        Self::Store(error)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: Option<String>,
}

/// Extracts a human-readable message from an error response body.
///
/// The backend answers with either a bare text body or a JSON map carrying a
/// `message` field; an empty body falls back to the status reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload
            .message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
        {
            return message.to_owned();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
