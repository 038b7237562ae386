use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRecordType {
    Session,
}

/// The live session value shared by the token store and its consumers.
///
/// Exactly one of these exists per running client; it is replaced whole on
/// every change, never mutated field-by-field in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at_epoch_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at_epoch_ms: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at_epoch_ms,
            member_id: None,
            nickname: None,
        }
    }

    #[must_use]
    pub fn with_member(mut self, member_id: i64, nickname: impl Into<String>) -> Self {
        self.member_id = Some(member_id);
        self.nickname = Some(nickname.into());
        self
    }

    /// Whether the session's access token has expired as of `epoch_ms`.
    #[must_use]
    pub fn is_expired_at(&self, epoch_ms: i64) -> bool {
        self.expires_at_epoch_ms <= epoch_ms
    }
}

/// On-disk envelope around a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(rename = "type")]
    pub record_type: SessionRecordType,
    pub version: u32,
    pub created_at: String,
    #[serde(flatten)]
    pub session: Session,
}

impl PersistedSession {
    #[must_use]
    pub fn v1(session: Session, created_at: impl Into<String>) -> Self {
        Self {
            record_type: SessionRecordType::Session,
            version: 1,
            created_at: created_at.into(),
            session,
        }
    }
}
