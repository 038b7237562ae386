use serde::{Deserialize, Serialize};

/// One comment record as served by the board API.
///
/// `reply_comment_id` is `None` for a root comment; otherwise it names the
/// direct parent, which may itself be a reply, so chains nest to any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub reply_comment_id: Option<i64>,
    pub member_id: i64,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(rename = "comment")]
    pub body: String,
    #[serde(default)]
    pub inserted: Option<String>,
}

impl Comment {
    #[must_use]
    pub fn new(id: i64, reply_comment_id: Option<i64>, member_id: i64, body: impl Into<String>) -> Self {
        Self {
            id,
            reply_comment_id,
            member_id,
            nickname: None,
            body: body.into(),
            inserted: None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.reply_comment_id.is_none()
    }
}
