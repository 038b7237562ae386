//! Bijective transform between numeric member ids and the opaque public
//! identifiers used in shareable diary URLs.
//!
//! Decoding is strict on purpose: a malformed or non-canonical identifier
//! must come back as `None`, never as a best-guess id, because misrouting to
//! another member's diary is a security-relevant bug.

/// Multiplicative factor of the public-id transform.
pub const PUBLIC_ID_FACTOR: i64 = 17;

const PUBLIC_ID_PREFIX: &str = "DIARY";
const PUBLIC_ID_SUFFIX: &str = "ID";

/// Encodes a numeric member id into its public identifier.
///
/// Defined only for positive ids; a non-positive id or a multiplication that
/// would overflow yields `None` rather than a truncated or wrapped value.
#[must_use]
pub fn encode_member_id(member_id: i64) -> Option<String> {
    if member_id <= 0 {
        return None;
    }
    let scaled = member_id.checked_mul(PUBLIC_ID_FACTOR)?;
    Some(format!("{PUBLIC_ID_PREFIX}-{scaled}-{PUBLIC_ID_SUFFIX}"))
}

/// Decodes a public identifier back to its member id.
///
/// Requires the exact `DIARY-<digits>-ID` shape with a canonical decimal
/// payload (no sign, no leading zeros) that is evenly divisible by
/// [`PUBLIC_ID_FACTOR`] and recovers a positive id.
#[must_use]
pub fn decode_public_id(public_id: &str) -> Option<i64> {
    let mut parts = public_id.split('-');
    let prefix = parts.next()?;
    let payload = parts.next()?;
    let suffix = parts.next()?;
    if parts.next().is_some() || prefix != PUBLIC_ID_PREFIX || suffix != PUBLIC_ID_SUFFIX {
        return None;
    }

    if payload.is_empty() || !payload.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if payload.len() > 1 && payload.starts_with('0') {
        return None;
    }

    let scaled: i64 = payload.parse().ok()?;
    if scaled <= 0 || scaled % PUBLIC_ID_FACTOR != 0 {
        return None;
    }

    let member_id = scaled / PUBLIC_ID_FACTOR;
    if member_id <= 0 {
        return None;
    }
    Some(member_id)
}
