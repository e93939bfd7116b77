//! Credential validation rules.
//!
//! DESIGN
//! ======
//! Validation is pure and synchronous: the same input always yields the same
//! result and nothing is cached. The form re-runs these checks on every
//! debounce firing, including for values that already passed.
//!
//! Secret checks run in a fixed order and stop at the first failure, so a
//! caller can always tell a length problem apart from a composition problem.

use std::sync::LazyLock;

use regex::Regex;

pub const MIN_SECRET_LEN: usize = 8;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").expect("identifier pattern compiles")
});

// =============================================================================
// ERROR TYPE
// =============================================================================

/// A per-field validation failure. The `Display` text is user-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email is required")]
    IdentifierRequired,
    #[error("Please enter a valid email address")]
    IdentifierFormat,
    #[error("Password is required")]
    SecretRequired,
    #[error("Password must be at least {min} characters")]
    SecretTooShort { min: usize },
    #[error("Password must contain at least one uppercase letter")]
    SecretMissingUppercase,
    #[error("Password must contain at least one digit")]
    SecretMissingDigit,
}

// =============================================================================
// RULES
// =============================================================================

/// Check an identifier (email address).
///
/// # Errors
///
/// Returns [`ValidationError::IdentifierRequired`] for an empty value and
/// [`ValidationError::IdentifierFormat`] when the address is malformed.
pub fn validate_identifier(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::IdentifierRequired);
    }
    if !IDENTIFIER_REGEX.is_match(raw) {
        return Err(ValidationError::IdentifierFormat);
    }
    Ok(())
}

/// Check a secret (password) for presence, length, and composition.
///
/// # Errors
///
/// Returns the first failing check, in order: required, length, uppercase,
/// digit.
pub fn validate_secret(raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::SecretRequired);
    }
    if raw.chars().count() < MIN_SECRET_LEN {
        return Err(ValidationError::SecretTooShort { min: MIN_SECRET_LEN });
    }
    if !raw.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::SecretMissingUppercase);
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::SecretMissingDigit);
    }
    Ok(())
}

// =============================================================================
// VALIDATOR TRAIT
// =============================================================================

/// Swappable validation capability. Enables substituting rules in tests.
pub trait Validator: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the identifier is rejected.
    fn validate_identifier(&self, raw: &str) -> Result<(), ValidationError>;

    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the secret is rejected.
    fn validate_secret(&self, raw: &str) -> Result<(), ValidationError>;
}

/// The production rule set backed by [`validate_identifier`] and
/// [`validate_secret`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialRules;

impl Validator for CredentialRules {
    fn validate_identifier(&self, raw: &str) -> Result<(), ValidationError> {
        validate_identifier(raw)
    }

    fn validate_secret(&self, raw: &str) -> Result<(), ValidationError> {
        validate_secret(raw)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
