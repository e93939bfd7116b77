//! Read-only views of the form published to the presentation layer.

use serde::Serialize;

use crate::auth::AuthOutcome;

/// Submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(AuthOutcome),
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSnapshot {
    pub value: String,
    pub error: Option<String>,
    pub last_validated_value: Option<String>,
}

/// Everything a view needs to render the form at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub identifier: FieldSnapshot,
    pub secret: FieldSnapshot,
    pub phase: Phase,
    pub is_submitting: bool,
    pub submission_error: Option<String>,
    pub is_authenticated: bool,
}
