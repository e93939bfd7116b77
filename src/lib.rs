//! Reactive core of a login form.
//!
//! ARCHITECTURE
//! ============
//! - `validation`: pure credential rules behind the `Validator` trait.
//! - `auth`: the async `Authenticator` boundary, its outcome type, and the
//!   session it owns.
//! - `form`: `LoginForm`, the debounced validation and submission state
//!   machine that depends only on the two traits above.
//! - `config`: environment-driven settings.
//! - `console`: a line-oriented driver standing in for a real UI.

pub mod auth;
pub mod config;
pub mod console;
pub mod form;
pub mod validation;

pub use auth::{AuthOutcome, Authenticator};
pub use form::{Field, FormSnapshot, GuardError, LoginForm, Phase, SubmitOutcome};
pub use validation::{CredentialRules, ValidationError, Validator};
