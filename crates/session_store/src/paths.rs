use std::path::{Path, PathBuf};

/// Directory under the user's home that holds client state.
pub const SESSION_DIR: &str = ".minihome";

/// File name of the persisted session document.
pub const SESSION_FILE: &str = "session.json";

/// Default location of the persisted session relative to `home`.
#[must_use]
pub fn session_file_path(home: &Path) -> PathBuf {
    home.join(SESSION_DIR).join(SESSION_FILE)
}
