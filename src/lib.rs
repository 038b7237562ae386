//! Client-side composition layer for the minihome web service.
//!
//! The transport, session persistence, and comment-tree crates are pure
//! building blocks; this crate wires them together into the two stateful
//! pieces a UI shell drives directly: [`SessionLifecycle`], which keeps the
//! persisted session and the expiry-driven auto-logout timer in step, and
//! [`ThreadView`], which owns the paged and threaded state of one diary's
//! comment section.

pub mod session;
pub mod thread;

pub use session::SessionLifecycle;
pub use thread::{CommentEdit, CommentPage, NewComment, ThreadView, DEFAULT_PAGE_SIZE};

pub use board_api::{
    decode_public_id, encode_member_id, ApiResponse, BoardApiClient, BoardApiConfig,
    BoardApiError, Destination, Navigate, RefreshObserver,
};
pub use comment_thread::{
    build_forest, flatten_visible, Comment, CommentNode, RenderedComment, ReplyVisibility,
};
pub use session_store::{Session, SessionStoreError, TokenStore};
