//! Runtime configuration parsed from environment variables.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::demo::{DEFAULT_DEMO_IDENTIFIER, DEFAULT_DEMO_SECRET};
use crate::auth::http::HttpAuthError;
use crate::auth::{Authenticator, DemoAuthenticator, HttpAuthenticator};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 1000;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("missing required env var {var}")]
    Missing { var: String },
    #[error(transparent)]
    Http(#[from] HttpAuthError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub debounce: Duration,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    Demo { identifier: String, secret: String, latency: Duration },
    Http { url: String, timeout: Duration },
}

impl AuthConfig {
    /// Instantiate the configured authenticator.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(&self) -> Result<Arc<dyn Authenticator>, ConfigError> {
        let authenticator: Arc<dyn Authenticator> = match self {
            Self::Demo { identifier, secret, latency } => {
                Arc::new(DemoAuthenticator::new(identifier.clone(), secret.clone(), *latency))
            }
            Self::Http { url, timeout } => Arc::new(HttpAuthenticator::new(url.clone(), *timeout)?),
        };
        Ok(authenticator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub form: FormConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `LOGIN_DEBOUNCE_MS`: default 500
    /// - `AUTH_MODE`: `demo` (default) or `http`
    /// - `AUTH_DEMO_IDENTIFIER` / `AUTH_DEMO_SECRET`: demo account
    /// - `AUTH_DEMO_LATENCY_MS`: default 1000
    /// - `AUTH_TIMEOUT_SECS`: default 10
    ///
    /// Required when `AUTH_MODE=http`:
    /// - `AUTH_URL`
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown `AUTH_MODE` or a missing `AUTH_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let form = FormConfig {
            debounce: Duration::from_millis(parse_or(&lookup, "LOGIN_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)),
        };

        let auth = match lookup("AUTH_MODE").as_deref().unwrap_or("demo") {
            "demo" => AuthConfig::Demo {
                identifier: lookup("AUTH_DEMO_IDENTIFIER").unwrap_or_else(|| DEFAULT_DEMO_IDENTIFIER.to_string()),
                secret: lookup("AUTH_DEMO_SECRET").unwrap_or_else(|| DEFAULT_DEMO_SECRET.to_string()),
                latency: Duration::from_millis(parse_or(&lookup, "AUTH_DEMO_LATENCY_MS", DEFAULT_DEMO_LATENCY_MS)),
            },
            "http" => {
                let url = lookup("AUTH_URL")
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| ConfigError::Missing { var: "AUTH_URL".into() })?;
                AuthConfig::Http {
                    url,
                    timeout: Duration::from_secs(parse_or(&lookup, "AUTH_TIMEOUT_SECS", DEFAULT_AUTH_TIMEOUT_SECS)),
                }
            }
            other => {
                return Err(ConfigError::Parse(format!("unknown AUTH_MODE: {other} (expected 'demo' or 'http')")));
            }
        };

        Ok(Self { form, auth })
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
