use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::SessionStoreError;
use crate::schema::{PersistedSession, Session};

/// Process-wide holder of the current access session.
///
/// All writes replace the whole session value, and the durable file is
/// written before the in-memory copy is swapped while holding the same lock,
/// so no observer sees memory and storage disagree.
pub struct TokenStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

impl TokenStore {
    /// Opens a store backed by `path`, adopting a persisted session when one
    /// is present and structurally valid. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(raw) => Some(parse_persisted(&path, &raw)?.session),
            Err(source) if source.kind() == ErrorKind::NotFound => None,
            Err(source) => {
                return Err(SessionStoreError::io("reading session file", &path, source))
            }
        };

        Ok(Self {
            path,
            current: Mutex::new(current),
        })
    }

    /// Returns a whole-value copy of the current session, if any.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Convenience accessor for the bare access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().as_ref().map(|session| session.access_token.clone())
    }

    /// Persists `session` durably and installs it in memory.
    pub fn set(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut current = self.lock();

        let record = PersistedSession::v1(session.clone(), now_rfc3339()?);
        let raw = serde_json::to_string_pretty(&record)
            .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| SessionStoreError::io("creating session directory", parent, source))?;
        }
        fs::write(&self.path, raw)
            .map_err(|source| SessionStoreError::io("writing session file", &self.path, source))?;

        *current = Some(session);
        Ok(())
    }

    /// Removes both the durable and in-memory copies. A no-op when neither
    /// exists.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        let mut current = self.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(source) if source.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SessionStoreError::io("removing session file", &self.path, source))
            }
        }

        *current = None;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_persisted(path: &Path, raw: &str) -> Result<PersistedSession, SessionStoreError> {
    let record: PersistedSession = serde_json::from_str(raw)
        .map_err(|source| SessionStoreError::json_parse(path, source))?;

    if record.version != 1 {
        return Err(SessionStoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: record.version,
        });
    }

    if OffsetDateTime::parse(&record.created_at, &Rfc3339).is_err() {
        return Err(SessionStoreError::InvalidTimestamp {
            path: path.to_path_buf(),
            value: record.created_at.clone(),
        });
    }

    Ok(record)
}

fn now_rfc3339() -> Result<String, SessionStoreError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(SessionStoreError::ClockFormat)
}
