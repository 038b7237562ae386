use std::fs;
use std::path::PathBuf;

use serde_json::json;
use session_store::{session_file_path, Session, SessionStoreError, TokenStore};
use tempfile::TempDir;

fn store_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("session.json");
    (dir, path)
}

fn write_raw(path: &PathBuf, raw: &str) {
    fs::write(path, raw).expect("session file should be written");
}

fn sample_session() -> Session {
    Session::new("header.payload.signature", 1_900_000_000_000).with_member(7, "haneul")
}

#[test]
fn open_missing_file_is_empty_store() {
    let (_dir, path) = store_path();

    let store = TokenStore::open(&path).expect("missing file must open empty");
    assert_eq!(store.get(), None);
    assert_eq!(store.access_token(), None);
}

#[test]
fn set_then_get_returns_whole_session() {
    let (_dir, path) = store_path();
    let store = TokenStore::open(&path).expect("store should open");

    store.set(sample_session()).expect("set should persist");

    let session = store.get().expect("session must be present");
    assert_eq!(session.access_token, "header.payload.signature");
    assert_eq!(session.expires_at_epoch_ms, 1_900_000_000_000);
    assert_eq!(session.member_id, Some(7));
    assert_eq!(session.nickname.as_deref(), Some("haneul"));
    assert_eq!(
        store.access_token().as_deref(),
        Some("header.payload.signature")
    );
}

#[test]
fn set_persists_durably_and_reopen_adopts_session() {
    let (_dir, path) = store_path();
    {
        let store = TokenStore::open(&path).expect("store should open");
        store.set(sample_session()).expect("set should persist");
    }

    let reopened = TokenStore::open(&path).expect("persisted file must reopen");
    assert_eq!(reopened.get(), Some(sample_session()));
}

#[test]
fn set_writes_file_matching_memory() {
    let (_dir, path) = store_path();
    let store = TokenStore::open(&path).expect("store should open");

    store.set(sample_session()).expect("set should persist");

    let raw = fs::read_to_string(&path).expect("file must exist after set");
    let on_disk: serde_json::Value = serde_json::from_str(&raw).expect("file must be JSON");
    let in_memory = store.get().expect("session must be present");
    assert_eq!(on_disk["access_token"], in_memory.access_token);
    assert_eq!(
        on_disk["expires_at_epoch_ms"],
        json!(in_memory.expires_at_epoch_ms)
    );
    assert_eq!(on_disk["version"], 1);
    assert_eq!(on_disk["type"], "session");
}

#[test]
fn clear_removes_file_and_memory() {
    let (_dir, path) = store_path();
    let store = TokenStore::open(&path).expect("store should open");
    store.set(sample_session()).expect("set should persist");

    store.clear().expect("clear should succeed");

    assert_eq!(store.get(), None);
    assert!(!path.exists());
}

#[test]
fn clear_is_idempotent_without_session() {
    let (_dir, path) = store_path();
    let store = TokenStore::open(&path).expect("store should open");

    store.clear().expect("clearing an empty store must be a no-op");
    store.clear().expect("second clear must also be a no-op");
    assert_eq!(store.get(), None);
}

#[test]
fn replacing_session_is_whole_value() {
    let (_dir, path) = store_path();
    let store = TokenStore::open(&path).expect("store should open");
    store.set(sample_session()).expect("first set should persist");

    let replacement = Session::new("new.token.sig", 2_000_000_000_000);
    store.set(replacement.clone()).expect("second set should persist");

    let session = store.get().expect("session must be present");
    assert_eq!(session, replacement);
    assert_eq!(session.member_id, None);
}

#[test]
fn open_rejects_malformed_file() {
    let (_dir, path) = store_path();
    write_raw(&path, "{not json");

    let error = TokenStore::open(&path).err().expect("malformed file must fail");
    assert!(matches!(error, SessionStoreError::JsonParse { .. }));
}

#[test]
fn open_rejects_unsupported_version() {
    let (_dir, path) = store_path();
    write_raw(
        &path,
        &json!({
            "type": "session",
            "version": 2,
            "created_at": "2026-02-14T00:00:00Z",
            "access_token": "t",
            "expires_at_epoch_ms": 0,
        })
        .to_string(),
    );

    let error = TokenStore::open(&path)
        .err()
        .expect("unsupported version must fail");
    assert!(matches!(
        error,
        SessionStoreError::UnsupportedVersion { found: 2, .. }
    ));
}

#[test]
fn open_rejects_invalid_created_at() {
    let (_dir, path) = store_path();
    write_raw(
        &path,
        &json!({
            "type": "session",
            "version": 1,
            "created_at": "yesterday",
            "access_token": "t",
            "expires_at_epoch_ms": 0,
        })
        .to_string(),
    );

    let error = TokenStore::open(&path)
        .err()
        .expect("invalid created_at must fail");
    assert!(matches!(error, SessionStoreError::InvalidTimestamp { .. }));
}

#[test]
fn session_expiry_check_is_inclusive() {
    let session = Session::new("t", 1_000);
    assert!(session.is_expired_at(1_000));
    assert!(session.is_expired_at(1_001));
    assert!(!session.is_expired_at(999));
}

#[test]
fn default_path_lives_under_minihome_dir() {
    let path = session_file_path(std::path::Path::new("/home/haneul"));
    assert_eq!(path, PathBuf::from("/home/haneul/.minihome/session.json"));
}
