//! Session state machine
//!
//! Tracks the lifecycle of a controller session so operations can check
//! their preconditions before touching the wire.
//!
//! ```text
//! Disconnected -> Connected  (on open_connection())
//! Connected    -> LoggedIn   (on login())
//! LoggedIn     -> Connected  (on logout())
//! any          -> Disconnected (on close_connection() or a connection error)
//! ```

/// State of a controller session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No serial connection is open (initial state).
    #[default]
    Disconnected,
    /// The serial connection is open but no login was performed.
    ///
    /// The controller answers identification requests in this state but
    /// rejects parameter access.
    Connected,
    /// A login succeeded; the full command set is available.
    LoggedIn,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connected => "connected",
            SessionState::LoggedIn => "logged in",
        }
    }

    /// Whether the connection is open, logged in or not.
    pub fn is_connected(&self) -> bool {
        !matches!(self, SessionState::Disconnected)
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(!SessionState::Disconnected.is_connected());
        assert!(SessionState::Connected.is_connected());
        assert!(!SessionState::Connected.is_logged_in());
        assert!(SessionState::LoggedIn.is_logged_in());
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }
}
