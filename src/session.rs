use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use board_api::headers::{token_expiry_epoch_ms, token_member_id};
use board_api::{Destination, Navigate, RefreshObserver};
use session_store::{Session, SessionStoreError, TokenStore};
use tokio::task::JoinHandle;

/// Owns the login/logout state transitions and the expiry-driven logout
/// timer.
///
/// At most one timer task is armed at a time; arming replaces and cancels
/// the previous one, so a refreshed token never leaves a stale early-logout
/// behind. All arming entry points must run on a tokio runtime.
pub struct SessionLifecycle {
    tokens: Arc<TokenStore>,
    navigator: Arc<dyn Navigate>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SessionLifecycle {
    #[must_use]
    pub fn new(tokens: Arc<TokenStore>, navigator: Arc<dyn Navigate>) -> Self {
        Self {
            tokens,
            navigator,
            timer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Installs `session` as the current login and arms the expiry timer.
    pub fn login(&self, session: Session) -> Result<(), SessionStoreError> {
        let expires_at = session.expires_at_epoch_ms;
        self.tokens.set(session)?;
        self.arm(expires_at);
        Ok(())
    }

    /// Installs a login from a bare access token, deriving the expiry from
    /// its `exp` claim.
    ///
    /// A token whose claims cannot be decoded is unusable for scheduling;
    /// the session ends immediately rather than running without an expiry.
    pub fn login_with_token(&self, access_token: &str) -> Result<(), SessionStoreError> {
        let Some(expires_at) = token_expiry_epoch_ms(access_token) else {
            log::warn!("access token claims could not be decoded, ending session");
            self.logout();
            return Ok(());
        };

        let mut session = Session::new(access_token, expires_at);
        session.member_id = token_member_id(access_token);
        self.login(session)
    }

    /// Re-adopts a persisted session on process start.
    ///
    /// A still-valid session arms the timer for its remaining lifetime; one
    /// that expired while the process was down is logged out right away.
    pub fn restore(&self) {
        match self.tokens.get() {
            Some(session) if !session.is_expired_at(epoch_ms_now()) => {
                self.arm(session.expires_at_epoch_ms);
            }
            Some(_) => {
                log::debug!("persisted session already expired, ending session");
                self.logout();
            }
            None => {}
        }
    }

    /// Ends the current session: cancels the timer, clears the store, and
    /// sends the user to the login page. Safe to call when already logged
    /// out.
    pub fn logout(&self) {
        self.disarm();
        end_session(&self.tokens, self.navigator.as_ref());
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.tokens.get().is_some()
    }

    /// Schedules a single-shot logout at `expires_at_epoch_ms`, replacing
    /// any timer armed earlier.
    ///
    /// A past-due expiry sleeps zero and fires on the next scheduling
    /// opportunity of the runtime, never synchronously inside the caller.
    fn arm(&self, expires_at_epoch_ms: i64) {
        let delay_ms = (expires_at_epoch_ms - epoch_ms_now()).max(0) as u64;
        let tokens = Arc::clone(&self.tokens);
        let navigator = Arc::clone(&self.navigator);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            log::debug!("access token expiry reached, ending session");
            end_session(&tokens, navigator.as_ref());
        });

        if let Some(previous) = self.timer_slot().replace(handle) {
            previous.abort();
        }
    }

    fn disarm(&self) {
        if let Some(handle) = self.timer_slot().take() {
            handle.abort();
        }
    }

    fn timer_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RefreshObserver for SessionLifecycle {
    /// A token refreshed mid-flight carries a new expiry; the timer follows
    /// it.
    fn token_refreshed(&self, session: &Session) {
        self.arm(session.expires_at_epoch_ms);
    }

    /// The interceptor already tore the session down; only the timer is
    /// left to cancel. The navigator was notified there, so a full
    /// `logout()` here would redirect twice.
    fn session_ended(&self) {
        self.disarm();
    }
}

impl Drop for SessionLifecycle {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Session teardown shared by explicit logout and the timer task.
fn end_session(tokens: &TokenStore, navigator: &dyn Navigate) {
    if let Err(error) = tokens.clear() {
        log::warn!("failed to clear persisted session: {error}");
    }
    navigator.redirect(Destination::Login);
}

fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
