use base64::{engine::general_purpose, Engine as _};
use board_api::headers::{
    build_headers, token_expiry_epoch_ms, token_member_id, HEADER_AUTHORIZATION,
    HEADER_USER_AGENT,
};
use board_api::BoardApiConfig;
use serde_json::json;

fn token_with_claims(claims: serde_json::Value) -> String {
    let payload = serde_json::to_vec(&claims).expect("serialize token claims");
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(payload);
    format!("header.{payload}.signature")
}

#[test]
fn bearer_header_is_attached_when_token_present() {
    let config = BoardApiConfig::default();
    let headers = build_headers(&config, Some("abc.def.ghi"));

    assert_eq!(
        headers.get(HEADER_AUTHORIZATION).map(String::as_str),
        Some("Bearer abc.def.ghi")
    );
}

#[test]
fn absent_or_blank_token_sends_unauthenticated() {
    let config = BoardApiConfig::default();

    assert!(!build_headers(&config, None).contains_key(HEADER_AUTHORIZATION));
    assert!(!build_headers(&config, Some("")).contains_key(HEADER_AUTHORIZATION));
    assert!(!build_headers(&config, Some("   ")).contains_key(HEADER_AUTHORIZATION));
}

#[test]
fn user_agent_override_and_extra_headers_are_merged() {
    let config = BoardApiConfig::default()
        .with_user_agent("minihome-test/1.0")
        .insert_header("X-Trace", "abc");

    let headers = build_headers(&config, None);
    assert_eq!(
        headers.get(HEADER_USER_AGENT).map(String::as_str),
        Some("minihome-test/1.0")
    );
    assert_eq!(headers.get("x-trace").map(String::as_str), Some("abc"));
}

#[test]
fn expiry_claim_is_decoded_to_epoch_ms() {
    let token = token_with_claims(json!({"exp": 1_900_000_000, "userId": 7}));

    assert_eq!(token_expiry_epoch_ms(&token), Some(1_900_000_000_000));
    assert_eq!(token_member_id(&token), Some(7));
}

#[test]
fn missing_claims_yield_none() {
    let token = token_with_claims(json!({"category": "access"}));

    assert_eq!(token_expiry_epoch_ms(&token), None);
    assert_eq!(token_member_id(&token), None);
}

#[test]
fn malformed_tokens_yield_none() {
    assert_eq!(token_expiry_epoch_ms("not-a-jwt"), None);
    assert_eq!(token_expiry_epoch_ms("a.b"), None);
    assert_eq!(token_expiry_epoch_ms("a.b.c.d"), None);
    assert_eq!(token_expiry_epoch_ms("header.!!!not-base64!!!.sig"), None);
}
