//! Credential fields and their live-validation bookkeeping.

use serde::Serialize;

use crate::validation::{ValidationError, Validator};

use super::snapshot::FieldSnapshot;

/// The two inputs of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Identifier,
    Secret,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Identifier, Field::Secret];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Secret => "secret",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Identifier => 0,
            Self::Secret => 1,
        }
    }

    /// Error to display while the user is typing.
    ///
    /// Blank input never produces an error here; emptiness is only enforced
    /// by the submit guard.
    #[must_use]
    pub fn live_error(self, validator: &dyn Validator, value: &str) -> Option<ValidationError> {
        if value.trim().is_empty() {
            return None;
        }
        let result = match self {
            Self::Identifier => validator.validate_identifier(value),
            Self::Secret => validator.validate_secret(value),
        };
        result.err()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input's value plus the result of its most recent validation pass.
///
/// `error` describes `last_validated_value`, which trails `value` until the
/// debounce fires. `generation` increments on every edit so a pass scheduled
/// for an older edit can tell it has been superseded.
#[derive(Debug, Clone, Default)]
pub struct CredentialField {
    value: String,
    error: Option<ValidationError>,
    last_validated_value: Option<String>,
    generation: u64,
}

impl CredentialField {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    #[must_use]
    pub fn last_validated_value(&self) -> Option<&str> {
        self.last_validated_value.as_deref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-empty and without a known error.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.value.is_empty() && self.error.is_none()
    }

    /// Replace the value and return the new generation.
    pub(crate) fn edit(&mut self, value: String) -> u64 {
        self.value = value;
        self.generation += 1;
        self.generation
    }

    pub(crate) fn record_validation(&mut self, error: Option<ValidationError>) {
        self.last_validated_value = Some(self.value.clone());
        self.error = error;
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    /// Empty the field. Bumps the generation so in-flight passes are dropped.
    pub(crate) fn clear(&mut self) {
        self.value.clear();
        self.error = None;
        self.last_validated_value = None;
        self.generation += 1;
    }

    #[must_use]
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            value: self.value.clone(),
            error: self.error.map(|e| e.to_string()),
            last_validated_value: self.last_validated_value.clone(),
        }
    }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod tests;
