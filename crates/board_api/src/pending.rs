use std::collections::BTreeMap;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

use crate::error::BoardApiError;

/// One multipart field, stored owned so the body can be rebuilt for replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl MultipartField {
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Body of a captured outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart payloads are kept as owned fields because an assembled form
    /// is consumed by a single send and cannot be replayed as-is.
    Multipart(Vec<MultipartField>),
}

/// A captured outbound request description eligible for exactly one
/// authorization retry.
///
/// The `retried` marker is one-shot: it is armed before a retry attempt and
/// checked before a retry is ever considered, so a request can never enter a
/// second reissue cycle.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    retried: bool,
}

impl PendingRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn with_multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// True when this request has already been replayed once.
    #[must_use]
    pub fn already_retried(&self) -> bool {
        self.retried
    }

    /// One-shot retry gate: the first call arms the marker and returns true,
    /// every later call returns false.
    pub fn begin_retry(&mut self) -> bool {
        if self.retried {
            return false;
        }
        self.retried = true;
        true
    }

    /// Assembles a sendable request, rebuilding any multipart body
    /// field-by-field so replays get a fresh form.
    pub fn to_request_builder(
        &self,
        http: &reqwest::Client,
        headers: &BTreeMap<String, String>,
    ) -> Result<reqwest::RequestBuilder, BoardApiError> {
        let mut builder = http.request(self.method.clone(), &self.url);
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        match &self.body {
            RequestBody::Empty => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Multipart(fields) => Ok(builder.multipart(build_form(fields)?)),
        }
    }
}

fn build_form(fields: &[MultipartField]) -> Result<Form, BoardApiError> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|_| {
                        BoardApiError::InvalidMultipartField(format!(
                            "invalid mime type '{mime}' for field '{name}'"
                        ))
                    })?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}
