// ── Generic form lifecycle ──
//
//   Editing ─► Validating ─► Submitting ─► Confirming ─► Editing
//                  │              └──────► Failed ─────► Editing
//                  └─► Editing (field errors, no request)
//
// The lifecycle never performs I/O itself: `begin_submit` hands back the
// command to dispatch and `complete` takes its result. The storefront
// wires the two together.

use std::fmt;

use tracing::{debug, warn};

use crate::command::{Command, CommandResult};
use crate::error::{CoreError, ValidationErrors};

/// A resource that can be created and edited through a form.
pub trait FormResource {
    type Key: Clone + fmt::Debug + fmt::Display + Send + 'static;
    type Draft: Default;
    type Output: Clone;

    /// Capitalized noun used in confirmation messages.
    const NOUN: &'static str;

    /// Validate `draft` and build the mutation to dispatch.
    fn to_command(
        draft: &Self::Draft,
        mode: &FormMode<Self::Key>,
    ) -> Result<Command, ValidationErrors>;

    /// Extract the saved resource from a successful command.
    fn accept(result: CommandResult) -> Result<Self::Output, CoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<K> {
    Create,
    Edit(K),
}

impl<K> FormMode<K> {
    pub fn is_create(&self) -> bool {
        matches!(self, FormMode::Create)
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(key) => Some(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Confirming { message: String },
    Failed { message: String },
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<O> {
    Confirmed { message: String, output: O },
    Failed { message: String },
}

/// Where a form goes once its confirmation has been shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormExit<K> {
    /// Create forms start over with a blank draft.
    Reset,
    /// Edit forms move on to the saved resource.
    ShowDetail(K),
}

pub struct FormLifecycle<R: FormResource> {
    mode: FormMode<R::Key>,
    draft: R::Draft,
    phase: FormPhase,
    dirty: bool,
    guard_armed: bool,
    validated: bool,
    field_errors: ValidationErrors,
    last_output: Option<R::Output>,
}

impl<R: FormResource> FormLifecycle<R> {
    /// A blank create form.
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, R::Draft::default())
    }

    /// An edit form for `key`, seeded with `draft`.
    pub fn edit(key: R::Key, draft: R::Draft) -> Self {
        Self::with_mode(FormMode::Edit(key), draft)
    }

    fn with_mode(mode: FormMode<R::Key>, draft: R::Draft) -> Self {
        Self {
            mode,
            draft,
            phase: FormPhase::Editing,
            dirty: false,
            guard_armed: false,
            validated: false,
            field_errors: ValidationErrors::new(),
            last_output: None,
        }
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn mode(&self) -> &FormMode<R::Key> {
        &self.mode
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether leaving now needs the user to confirm abandoning edits.
    pub fn guard_armed(&self) -> bool {
        self.guard_armed
    }

    /// Fields are read-only while a submission is in flight or confirming.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.phase,
            FormPhase::Submitting | FormPhase::Confirming { .. }
        )
    }

    /// Whether a submit has been attempted, so field errors should show.
    pub fn was_validated(&self) -> bool {
        self.validated
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Confirming { message } => Some(message),
            _ => None,
        }
    }

    /// The resource saved by the most recent successful submission.
    pub fn last_output(&self) -> Option<&R::Output> {
        self.last_output.as_ref()
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Apply an edit to the draft. `edit` returns whether it changed
    /// anything; a change marks the form dirty and arms the guard.
    pub fn update(&mut self, edit: impl FnOnce(&mut R::Draft) -> bool) -> Result<bool, CoreError> {
        if self.is_locked() {
            return Err(self.locked());
        }
        let changed = edit(&mut self.draft);
        if changed {
            self.dirty = true;
            self.guard_armed = true;
        }
        Ok(changed)
    }

    /// Dismiss a submission error. Returns whether one was showing.
    pub fn dismiss_error(&mut self) -> bool {
        if matches!(self.phase, FormPhase::Failed { .. }) {
            self.phase = FormPhase::Editing;
            true
        } else {
            false
        }
    }

    /// Ask before leaving a form with unsaved edits. `ask` is only
    /// consulted while the guard is armed.
    pub fn confirm_leave(&self, ask: impl FnOnce() -> bool) -> bool {
        !self.guard_armed || ask()
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate the draft and, if it passes, enter `Submitting` and
    /// return the command to dispatch. On validation failure the form
    /// returns to `Editing` with field errors and nothing is dispatched.
    pub fn begin_submit(&mut self) -> Result<Command, CoreError> {
        if self.is_locked() {
            return Err(self.locked());
        }
        self.phase = FormPhase::Validating;
        self.validated = true;

        match R::to_command(&self.draft, &self.mode) {
            Ok(command) => {
                self.field_errors.clear();
                self.phase = FormPhase::Submitting;
                self.guard_armed = false;
                debug!(kind = %command.kind(), "form submitting");
                Ok(command)
            }
            Err(errors) => {
                debug!(errors = %errors, "form validation failed");
                self.field_errors = errors.clone();
                self.phase = FormPhase::Editing;
                Err(CoreError::Validation(errors))
            }
        }
    }

    /// Record the result of the command returned by `begin_submit`.
    ///
    /// Success enters `Confirming`. Failure enters `Failed` with the
    /// field values untouched and the guard re-armed; nothing is retried.
    pub fn complete(
        &mut self,
        result: Result<CommandResult, CoreError>,
    ) -> Result<SubmitOutcome<R::Output>, CoreError> {
        if self.phase != FormPhase::Submitting {
            return Err(CoreError::InvalidTransition {
                state: self.phase.to_string(),
                action: "complete a submission".into(),
            });
        }

        match result.and_then(R::accept) {
            Ok(output) => {
                let verb = if self.mode.is_create() { "added" } else { "updated" };
                let message = format!("{} {verb} successfully.", R::NOUN);
                self.phase = FormPhase::Confirming {
                    message: message.clone(),
                };
                self.dirty = false;
                self.last_output = Some(output.clone());
                Ok(SubmitOutcome::Confirmed { message, output })
            }
            Err(e) => {
                warn!(error = %e, "form submission failed");
                let message = format!("Error submitting form. Please try again: {}", e.cause());
                self.phase = FormPhase::Failed {
                    message: message.clone(),
                };
                self.guard_armed = self.dirty;
                Ok(SubmitOutcome::Failed { message })
            }
        }
    }

    /// Leave `Confirming` once the confirmation has been shown. Create
    /// forms reset to a blank draft; edit forms report the key to show.
    pub fn finish_confirmation(&mut self) -> Result<FormExit<R::Key>, CoreError> {
        if !matches!(self.phase, FormPhase::Confirming { .. }) {
            return Err(CoreError::InvalidTransition {
                state: self.phase.to_string(),
                action: "finish a confirmation".into(),
            });
        }
        self.phase = FormPhase::Editing;

        match &self.mode {
            FormMode::Create => {
                self.draft = R::Draft::default();
                self.dirty = false;
                self.guard_armed = false;
                self.validated = false;
                self.field_errors.clear();
                Ok(FormExit::Reset)
            }
            FormMode::Edit(key) => Ok(FormExit::ShowDetail(key.clone())),
        }
    }

    fn locked(&self) -> CoreError {
        CoreError::FormLocked {
            phase: self.phase.to_string(),
        }
    }
}
