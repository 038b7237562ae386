use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::config::BoardApiConfig;

pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_ACCEPT: &str = "accept";
/// Response header carrying a freshly issued access token.
pub const HEADER_ACCESS: &str = "access";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for one outbound board API request.
///
/// An absent or blank token sends the request unauthenticated rather than
/// failing; the server decides what anonymous callers may see.
#[must_use]
pub fn build_headers(
    config: &BoardApiConfig,
    access_token: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(token) = access_token.map(str::trim).filter(|token| !token.is_empty()) {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));
    }
    headers.insert(HEADER_ACCEPT.to_owned(), "application/json".to_owned());

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}

/// Extracts the `exp` claim from an access token, in epoch milliseconds.
///
/// This peeks at the payload segment without verifying the signature; the
/// client only schedules around expiry, the server remains the authority.
#[must_use]
pub fn token_expiry_epoch_ms(token: &str) -> Option<i64> {
    decode_claims(token)?
        .exp
        .and_then(|exp_sec| exp_sec.checked_mul(1000))
}

/// Extracts the `userId` claim from an access token.
#[must_use]
pub fn token_member_id(token: &str) -> Option<i64> {
    decode_claims(token)?.user_id
}

fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let payload_segment = parts.next()?;
    let _signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let decoded = decode_jwt_segment(payload_segment)?;
    serde_json::from_slice::<TokenClaims>(&decoded).ok()
}

fn decode_jwt_segment(segment: &str) -> Option<Vec<u8>> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| general_purpose::URL_SAFE.decode(segment))
        .ok()
}

fn default_user_agent() -> String {
    match runtime_os_triplet() {
        Some((platform, release, arch)) => format!("minihome ({platform} {release}; {arch})"),
        None => "minihome (unknown)".to_owned(),
    }
}

fn normalize_arch(arch: &str) -> String {
    match arch.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => "x64".to_owned(),
        "x86" | "i386" | "i686" => "ia32".to_owned(),
        "aarch64" => "arm64".to_owned(),
        normalized => normalized.to_owned(),
    }
}

#[cfg(unix)]
fn runtime_os_triplet() -> Option<(String, String, String)> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::utsname>::uninit();
    // SAFETY: `uname` initializes the provided `utsname` struct on success.
    let rc = unsafe { libc::uname(raw.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }

    // SAFETY: We checked `uname` returned success, so `raw` is initialized.
    let raw = unsafe { raw.assume_init() };
    // SAFETY: `uname` provides NUL-terminated fixed-size C strings.
    let platform = unsafe { CStr::from_ptr(raw.sysname.as_ptr()) }
        .to_string_lossy()
        .to_lowercase();
    // SAFETY: `uname` provides NUL-terminated fixed-size C strings.
    let release = unsafe { CStr::from_ptr(raw.release.as_ptr()) }
        .to_string_lossy()
        .into_owned();
    // SAFETY: `uname` provides NUL-terminated fixed-size C strings.
    let arch = unsafe { CStr::from_ptr(raw.machine.as_ptr()) }.to_string_lossy();
    let arch = normalize_arch(&arch);

    if platform.is_empty() || release.is_empty() || arch.is_empty() {
        None
    } else {
        Some((platform, release, arch))
    }
}

#[cfg(not(unix))]
fn runtime_os_triplet() -> Option<(String, String, String)> {
    None
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default, rename = "userId")]
    user_id: Option<i64>,
}
