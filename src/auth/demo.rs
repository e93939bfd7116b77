//! Demo authenticator: one known account behind a simulated round trip.

use std::time::Duration;

use tracing::debug;

use super::{AuthOutcome, Authenticator, Session};

pub const DEFAULT_DEMO_IDENTIFIER: &str = "test@example.com";
pub const DEFAULT_DEMO_SECRET: &str = "Password123";
pub const DEFAULT_DEMO_LATENCY: Duration = Duration::from_secs(1);

/// Accepts exactly one identifier/secret pair. Every mismatch, including
/// empty credentials, is `InvalidCredentials`.
#[derive(Debug)]
pub struct DemoAuthenticator {
    identifier: String,
    secret: String,
    latency: Duration,
    session: Session,
}

impl DemoAuthenticator {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>, latency: Duration) -> Self {
        Self { identifier: identifier.into(), secret: secret.into(), latency, session: Session::new() }
    }
}

impl Default for DemoAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_DEMO_IDENTIFIER, DEFAULT_DEMO_SECRET, DEFAULT_DEMO_LATENCY)
    }
}

#[async_trait::async_trait]
impl Authenticator for DemoAuthenticator {
    async fn login(&self, identifier: &str, secret: &str) -> AuthOutcome {
        tokio::time::sleep(self.latency).await;

        if identifier == self.identifier && secret == self.secret {
            self.session.authenticate(identifier);
            debug!(%identifier, "demo login accepted");
            AuthOutcome::Success
        } else {
            debug!(%identifier, "demo login rejected");
            AuthOutcome::InvalidCredentials
        }
    }

    fn logout(&self) {
        self.session.clear();
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }

    fn current_identifier(&self) -> Option<String> {
        self.session.identifier()
    }
}

#[cfg(test)]
#[path = "demo_test.rs"]
mod tests;
