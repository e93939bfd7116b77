//! Login form state machine.
//!
//! DESIGN
//! ======
//! `LoginForm` is a cloneable handle over shared state guarded by a single
//! mutex. Every mutation takes the lock, updates the state, and publishes a
//! fresh [`FormSnapshot`] on a watch channel before releasing it. The lock is
//! never held across an `.await`.
//!
//! DEBOUNCE
//! ========
//! Each edit bumps the field's generation, aborts the field's pending timer,
//! and spawns a new one. When a timer fires it re-checks the generation under
//! the lock and validates the field's *current* value. A timer that woke just
//! before a newer edit sees a stale generation and does nothing, so at most
//! one pass runs per burst of edits. Timers hold a `Weak` reference and die
//! with the form.
//!
//! SUBMISSION
//! ==========
//! `submit` runs its guards synchronously, then hands the login call to a
//! spawned task. Dropping the `submit` future therefore never cancels a login
//! that has started: the outcome is always applied to the form. A panicking
//! authenticator is caught inside that task and finishes the form with
//! `Unknown`, so the phase never sticks at `Submitting`.

pub mod field;
pub mod snapshot;

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::{AuthOutcome, Authenticator};
use crate::config::FormConfig;
use crate::validation::{ValidationError, Validator};

pub use field::{CredentialField, Field};
pub use snapshot::{FieldSnapshot, FormSnapshot, Phase};

// =============================================================================
// SUBMIT RESULT
// =============================================================================

/// Why a `submit` call did not reach the authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Please fix all validation errors")]
    InvalidForm,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("already signed in")]
    AlreadyAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The authenticator was called and its outcome applied.
    Completed(AuthOutcome),
    /// A guard stopped the submission before any backend call.
    Rejected(GuardError),
}

// =============================================================================
// FORM STATE
// =============================================================================

struct FormData {
    fields: [CredentialField; 2],
    pending: [Option<JoinHandle<()>>; 2],
    phase: Phase,
    submission_error: Option<String>,
    is_authenticated: bool,
}

impl FormData {
    fn new() -> Self {
        Self {
            fields: [CredentialField::default(), CredentialField::default()],
            pending: [None, None],
            phase: Phase::Idle,
            submission_error: None,
            is_authenticated: false,
        }
    }

    fn field(&self, field: Field) -> &CredentialField {
        &self.fields[field.index()]
    }

    fn is_submittable(&self) -> bool {
        self.fields.iter().all(CredentialField::is_ready)
    }

    fn cancel_pending(&mut self) {
        for handle in self.pending.iter_mut().filter_map(Option::take) {
            handle.abort();
        }
    }

    /// Empty both fields and drop every error. Leaves an in-flight
    /// submission's phase alone.
    fn clear_form(&mut self) {
        self.cancel_pending();
        for field in &mut self.fields {
            field.clear();
        }
        self.submission_error = None;
        if self.phase != Phase::Submitting {
            self.phase = Phase::Idle;
        }
    }

    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            identifier: self.field(Field::Identifier).snapshot(),
            secret: self.field(Field::Secret).snapshot(),
            phase: self.phase,
            is_submitting: self.phase == Phase::Submitting,
            submission_error: self.submission_error.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

struct Inner {
    id: Uuid,
    authenticator: Arc<dyn Authenticator>,
    validator: Arc<dyn Validator>,
    debounce: Duration,
    state: Mutex<FormData>,
    updates: watch::Sender<FormSnapshot>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, FormData> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, data: &FormData) {
        self.updates.send_replace(data.snapshot());
    }

    /// Debounce timer body. Validates the field's current value unless a
    /// newer edit superseded this pass.
    fn run_validation(&self, field: Field, generation: u64) {
        let mut data = self.lock();
        let idx = field.index();
        if data.fields[idx].generation() != generation {
            debug!(form_id = %self.id, %field, generation, "validation pass superseded");
            return;
        }
        data.pending[idx] = None;

        let error = field.live_error(self.validator.as_ref(), data.fields[idx].value());
        data.fields[idx].record_validation(error);
        debug!(form_id = %self.id, %field, error = ?error, "field validated");
        self.publish(&data);
    }

    fn finish_submission(&self, outcome: AuthOutcome) {
        let mut data = self.lock();
        if outcome.is_success() {
            data.phase = Phase::Succeeded;
            data.is_authenticated = true;
            data.submission_error = None;
        } else {
            data.phase = Phase::Failed(outcome);
            data.submission_error = outcome.message().map(str::to_owned);
        }
        self.publish(&data);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel_pending();
    }
}

/// Reactive core of a login form: field values, debounced per-field errors,
/// and the submission lifecycle.
///
/// Cloning yields another handle to the same form.
#[derive(Clone)]
pub struct LoginForm {
    inner: Arc<Inner>,
}

impl LoginForm {
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>, validator: Arc<dyn Validator>, config: &FormConfig) -> Self {
        let (updates, _) = watch::channel(FormSnapshot::default());
        let inner = Inner {
            id: Uuid::new_v4(),
            authenticator,
            validator,
            debounce: config.debounce,
            state: Mutex::new(FormData::new()),
            updates,
        };
        debug!(form_id = %inner.id, debounce = ?inner.debounce, "login form created");
        Self { inner: Arc::new(inner) }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Set a field's value and (re)start its debounce timer.
    ///
    /// A completed submission drops back to [`Phase::Idle`]. The visible
    /// submission error is kept until the next submit or `clear_errors`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn set_field_value(&self, field: Field, value: impl Into<String>) {
        let mut data = self.inner.lock();
        let idx = field.index();
        let generation = data.fields[idx].edit(value.into());
        if data.phase.is_terminal() {
            data.phase = Phase::Idle;
        }
        if let Some(previous) = data.pending[idx].take() {
            previous.abort();
        }
        data.pending[idx] = Some(self.schedule_validation(field, generation));
        self.inner.publish(&data);
    }

    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn set_identifier(&self, value: impl Into<String>) {
        self.set_field_value(Field::Identifier, value);
    }

    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn set_secret(&self, value: impl Into<String>) {
        self.set_field_value(Field::Secret, value);
    }

    fn schedule_validation(&self, field: Field, generation: u64) -> JoinHandle<()> {
        let deadline = Instant::now() + self.inner.debounce;
        let form = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = form.upgrade() {
                inner.run_validation(field, generation);
            }
        })
    }

    /// Attempt to sign in with the current field values.
    ///
    /// Rejected without calling the authenticator when a submission is
    /// already in flight, when the form is already signed in, or when either
    /// field is empty or has a known error. Only the last case sets the
    /// submission error.
    pub async fn submit(&self) -> SubmitOutcome {
        let (identifier, secret) = {
            let mut data = self.inner.lock();
            if data.phase == Phase::Submitting {
                debug!(form_id = %self.inner.id, "submit ignored: already in flight");
                return SubmitOutcome::Rejected(GuardError::InFlight);
            }
            if data.is_authenticated {
                debug!(form_id = %self.inner.id, "submit ignored: already authenticated");
                return SubmitOutcome::Rejected(GuardError::AlreadyAuthenticated);
            }
            if !data.is_submittable() {
                data.submission_error = Some(GuardError::InvalidForm.to_string());
                self.inner.publish(&data);
                debug!(form_id = %self.inner.id, "submit blocked by validation");
                return SubmitOutcome::Rejected(GuardError::InvalidForm);
            }

            data.phase = Phase::Submitting;
            data.submission_error = None;
            self.inner.publish(&data);
            (
                data.field(Field::Identifier).value().to_owned(),
                data.field(Field::Secret).value().to_owned(),
            )
        };

        info!(form_id = %self.inner.id, %identifier, "submitting credentials");
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let login = inner.authenticator.login(&identifier, &secret);
            let outcome = match AssertUnwindSafe(login).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!(form_id = %inner.id, "authenticator panicked during login");
                    AuthOutcome::Unknown
                }
            };
            inner.finish_submission(outcome);
            outcome
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(form_id = %self.inner.id, error = %e, "login task failed");
                if self.inner.lock().phase == Phase::Submitting {
                    self.inner.finish_submission(AuthOutcome::Unknown);
                }
                AuthOutcome::Unknown
            }
        };
        info!(form_id = %self.inner.id, %outcome, "submission resolved");
        SubmitOutcome::Completed(outcome)
    }

    /// Sign out and reset the whole form.
    pub fn logout(&self) {
        self.inner.authenticator.logout();
        let mut data = self.inner.lock();
        data.clear_form();
        data.is_authenticated = false;
        self.inner.publish(&data);
        info!(form_id = %self.inner.id, "logged out");
    }

    /// Clear fields, errors, and pending validations. The session is kept.
    pub fn reset(&self) {
        let mut data = self.inner.lock();
        data.clear_form();
        self.inner.publish(&data);
    }

    /// Drop the submission error and both field errors. Values and phase are
    /// untouched.
    pub fn clear_errors(&self) {
        let mut data = self.inner.lock();
        data.submission_error = None;
        for field in &mut data.fields {
            field.clear_error();
        }
        self.inner.publish(&data);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn value(&self, field: Field) -> String {
        self.inner.lock().field(field).value().to_owned()
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<ValidationError> {
        self.inner.lock().field(field).error()
    }

    #[must_use]
    pub fn error_message(&self, field: Field) -> Option<String> {
        self.error(field).map(|e| e.to_string())
    }

    #[must_use]
    pub fn has_pending_validation(&self, field: Field) -> bool {
        self.inner.lock().pending[field.index()].is_some()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase() == Phase::Submitting
    }

    #[must_use]
    pub fn submission_error(&self) -> Option<String> {
        self.inner.lock().submission_error.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().is_authenticated
    }

    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.inner.lock().is_submittable()
    }

    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.lock().snapshot()
    }

    /// Receive a new [`FormSnapshot`] after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.inner.updates.subscribe()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
