/// Client-side navigational destination, as the UI shell names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Application entry point.
    Root,
    Login,
    Signup,
    /// A member's public diary page, addressed by its public identifier.
    Diary(String),
    /// Any other route the shell knows about.
    Other(String),
}

impl Destination {
    /// Destinations where a failed reissue never forces a logout redirect.
    ///
    /// A visitor already at the entry point, login, or signup page is outside
    /// the authenticated area; redirecting them to login again would loop.
    #[must_use]
    pub fn is_reissue_exempt(&self) -> bool {
        matches!(self, Self::Root | Self::Login | Self::Signup)
    }
}

/// Seam through which session-ending side effects reach the UI shell.
///
/// The transport layer never renders anything itself; it reports where the
/// user currently is and asks the shell to move or notify.
pub trait Navigate: Send + Sync {
    /// Destination the user is currently viewing.
    fn current(&self) -> Destination;

    /// Moves the user to `destination`.
    fn redirect(&self, destination: Destination);

    /// Surfaces the session-expired notice.
    fn notify_session_expired(&self);
}
