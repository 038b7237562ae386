//! Threaded-comment model for the minihome board.
//!
//! This crate is a pure function of data: it turns the flat comment list the
//! server returns into a forest of reply trees and computes what a consumer
//! should display under the root-level truncation policy. It knows nothing
//! about transport, sessions, or rendering.

mod display;
mod model;
mod tree;

pub use display::{
    flatten_visible, RenderedComment, ReplyVisibility, DEFAULT_REPLY_CAP,
};
pub use model::Comment;
pub use tree::{build_forest, CommentNode};
