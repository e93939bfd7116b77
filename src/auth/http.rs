//! HTTP authenticator that posts credentials to a login endpoint.
//!
//! Status and transport failures are folded into [`AuthOutcome`] so the form
//! never sees a raw transport error.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{AuthOutcome, Authenticator, Session};

#[derive(Debug, thiserror::Error)]
pub enum HttpAuthError {
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    secret: &'a str,
}

pub struct HttpAuthenticator {
    client: reqwest::Client,
    url: String,
    session: Session,
}

impl HttpAuthenticator {
    /// Build an authenticator for `url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HttpAuthError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HttpAuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpAuthError::ClientBuild(e.to_string()))?;
        Ok(Self { client, url: url.into(), session: Session::new() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, identifier: &str, secret: &str) -> AuthOutcome {
        let result = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(&LoginRequest { identifier, secret })
            .send()
            .await;

        let outcome = match result {
            Ok(resp) => classify_status(resp.status().as_u16()),
            Err(e) => {
                warn!(error = %e, url = %self.url, "login request failed");
                classify_transport(&e)
            }
        };

        if outcome.is_success() {
            self.session.authenticate(identifier);
        }
        debug!(%identifier, %outcome, "http login resolved");
        outcome
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

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Map an HTTP status code to a login outcome.
#[must_use]
pub fn classify_status(status: u16) -> AuthOutcome {
    match status {
        200..=299 => AuthOutcome::Success,
        401 | 403 => AuthOutcome::InvalidCredentials,
        500..=599 => AuthOutcome::ServerError,
        _ => AuthOutcome::Unknown,
    }
}

fn classify_transport(err: &reqwest::Error) -> AuthOutcome {
    if err.is_connect() || err.is_timeout() {
        return AuthOutcome::NetworkError;
    }
    err.status()
        .map_or(AuthOutcome::Unknown, |s| classify_status(s.as_u16()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
