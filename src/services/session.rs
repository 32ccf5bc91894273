//! Per-session auth context and session tokens.
//!
//! DESIGN
//! ======
//! `SessionContext` is the explicit replacement for ambient per-session
//! state: every render cycle receives it by `&mut`, and only the auth gate's
//! transitions change it. Fields are private so that
//! `authenticated == username.is_some() == (phase == LoggedIn)` always holds.

use std::fmt::Write;

use rand::Rng;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// True if `raw` has the shape produced by [`generate_token`].
#[must_use]
pub fn is_well_formed_token(raw: &str) -> bool {
    raw.len() == 64 && raw.chars().all(|c| c.is_ascii_hexdigit())
}

// =============================================================================
// AUTH PHASE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    LoggedOut,
    /// Credentials submitted, verification pending.
    LoggingIn,
    LoggedIn,
}

// =============================================================================
// SESSION CONTEXT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    authenticated: bool,
    username: Option<String>,
    phase: AuthPhase,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// `LoggedOut -> LoggingIn`. No-op from any other phase.
    pub(crate) fn begin_login(&mut self) {
        if self.phase == AuthPhase::LoggedOut {
            self.phase = AuthPhase::LoggingIn;
        }
    }

    /// `LoggingIn -> LoggedIn`. An empty username is treated as a failure.
    pub(crate) fn complete_login(&mut self, username: String) {
        if self.phase != AuthPhase::LoggingIn {
            return;
        }
        if username.is_empty() {
            self.fail_login();
            return;
        }
        self.phase = AuthPhase::LoggedIn;
        self.authenticated = true;
        self.username = Some(username);
    }

    /// `LoggingIn -> LoggedOut`.
    pub(crate) fn fail_login(&mut self) {
        if self.phase == AuthPhase::LoggingIn {
            self.phase = AuthPhase::LoggedOut;
        }
    }

    /// Any phase -> `LoggedOut`, clearing the identity.
    pub(crate) fn sign_out(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
