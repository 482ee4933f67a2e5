//! Session lifecycle notifications.

/// Why the user has to go back to the login view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    /// The user logged out.
    LoggedOut,
    /// A refresh was needed but no refresh token was stored.
    SessionExpired,
    /// The refresh call was rejected or failed.
    RefreshFailed,
}

/// Events broadcast by the session manager.
///
/// `LoginRequired` is the "navigate to login" signal: front ends react to it
/// by leaving protected views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login stored a fresh token pair.
    LoggedIn,
    /// A refresh replaced the stored token pair.
    Refreshed,
    /// Credentials were cleared.
    LoginRequired { reason: LoginReason },
}
