/// Default base URL for board API requests.
pub const DEFAULT_BOARD_BASE_URL: &str = "http://localhost:8080/api";

/// Path of the token reissue endpoint, relative to the API base.
pub const REISSUE_PATH: &str = "/member/reissue";

/// Joins an API path onto a base URL with exactly one separating slash.
///
/// An empty base falls back to [`DEFAULT_BOARD_BASE_URL`].
#[must_use]
pub fn join_api_url(base: &str, path: &str) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_BOARD_BASE_URL
    } else {
        base.trim()
    };

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
