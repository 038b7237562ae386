//! Transport and authorization plumbing for the minihome board API.
//!
//! This crate owns the authenticated request path only: bearer header
//! construction, the one-shot reissue-and-retry interceptor, the public-id
//! codec used in shareable URLs, and the navigation seam the UI shell plugs
//! into. It contains no rendering and no server-side auth logic.
//!
//! The interceptor contract: one unauthorized response buys exactly one
//! reissue attempt and one replay of the original request; a second
//! unauthorized response is handed back to the caller untouched.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod navigate;
pub mod pending;
pub mod public_id;
pub mod reissue;
pub mod url;

pub use client::{ApiResponse, BoardApiClient, RefreshObserver};
pub use config::BoardApiConfig;
pub use error::BoardApiError;
pub use navigate::{Destination, Navigate};
pub use pending::{MultipartField, PendingRequest, RequestBody};
pub use public_id::{decode_public_id, encode_member_id, PUBLIC_ID_FACTOR};
pub use reissue::{classify_session_invalid, SessionInvalidMarker};
pub use url::{join_api_url, DEFAULT_BOARD_BASE_URL, REISSUE_PATH};
