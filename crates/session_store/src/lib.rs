//! Durable client-session storage.
//!
//! One process-wide [`TokenStore`] holds the live access session and mirrors
//! it to a single JSON file, so a restarted process re-adopts the same
//! session shape. The in-memory value and the durable copy are always
//! updated under one lock; no reader can observe them disagreeing.

mod error;
mod paths;
mod schema;
mod store;

pub use error::SessionStoreError;
pub use paths::{session_file_path, SESSION_DIR, SESSION_FILE};
pub use schema::{PersistedSession, Session, SessionRecordType};
pub use store::TokenStore;
