//! Authentication boundary.
//!
//! DESIGN
//! ======
//! The form talks to the backend only through [`Authenticator`]. A login
//! attempt resolves to an [`AuthOutcome`] value rather than an error, so the
//! caller always has something to display. The authenticator is the only
//! component allowed to mutate the [`Session`].

pub mod demo;
pub mod http;

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

pub use demo::DemoAuthenticator;
pub use http::HttpAuthenticator;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of a single login attempt. Closed set; `Unknown` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    Success,
    InvalidCredentials,
    NetworkError,
    ServerError,
    Unknown,
}

impl AuthOutcome {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// User-facing text for a failed attempt. `None` for `Success`.
    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Success => None,
            Self::InvalidCredentials => Some("Invalid email or password"),
            Self::NetworkError => Some("Network connection error"),
            Self::ServerError => Some("Server error, please try again later"),
            Self::Unknown => Some("An unknown error occurred"),
        }
    }

    /// Stable short label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// The identifier currently signed in, if any.
#[derive(Debug, Default)]
pub struct Session {
    identifier: Mutex<Option<String>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticate(&self, identifier: &str) {
        *self.lock() = Some(identifier.to_owned());
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    #[must_use]
    pub fn identifier(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.identifier.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// AUTHENTICATOR TRAIT
// =============================================================================

/// Backend-neutral async login contract. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    /// Perform exactly one backend round trip for the given credentials.
    ///
    /// On `Success` the session is authenticated as `identifier`. Any other
    /// outcome leaves the session signed out.
    async fn login(&self, identifier: &str, secret: &str) -> AuthOutcome;

    /// Clear the session. Safe to call when already signed out.
    fn logout(&self);

    fn is_authenticated(&self) -> bool;

    fn current_identifier(&self) -> Option<String>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
