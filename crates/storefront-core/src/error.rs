// ── Core error types ──
//
// User-facing errors from storefront-core. Consumers never match on raw
// HTTP failures: API errors are classified per operation into fetch or
// mutation failures, and form validation problems never leave the crate
// as anything but `Validation`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::ProductId;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Failed to fetch {resource}: {message}")]
    Fetch {
        resource: String,
        message: String,
        failure: FailureKind,
        status: Option<u16>,
    },

    #[error("Product not found: {id}")]
    ProductNotFound { id: String },

    #[error("Failed to {kind} product: {message}")]
    Mutation {
        kind: MutationKind,
        message: String,
        failure: FailureKind,
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Form is locked while {phase}")]
    FormLocked { phase: String },

    #[error("A {operation} is already in progress")]
    FlowBusy { operation: String },

    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },

    #[error("View was disposed before the operation completed")]
    Disposed,

    #[error("Storefront service is not running")]
    ServiceStopped,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Connection,
    Timeout,
    Status,
    NotFound,
    Decode,
}

/// The write operation a [`CoreError::Mutation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl CoreError {
    /// Classify a failed list or get-by-id request.
    pub fn fetch(resource: impl Into<String>, err: &storefront_api::Error) -> Self {
        let (failure, status) = classify(err);
        CoreError::Fetch {
            resource: resource.into(),
            message: err.to_string(),
            failure,
            status,
        }
    }

    /// Classify a failed get-by-id, reporting unknown ids as
    /// [`CoreError::ProductNotFound`].
    pub fn fetch_product(id: &ProductId, err: &storefront_api::Error) -> Self {
        if err.is_not_found() {
            CoreError::ProductNotFound { id: id.to_string() }
        } else {
            Self::fetch(format!("product {id}"), err)
        }
    }

    /// Classify a failed create, update or delete.
    pub fn mutation(kind: MutationKind, err: &storefront_api::Error) -> Self {
        let (failure, status) = classify(err);
        CoreError::Mutation {
            kind,
            message: err.to_string(),
            failure,
            status,
        }
    }

    /// The underlying cause, without the operation prefix.
    ///
    /// Used to build the messages surfaced next to a form or deletion
    /// prompt, which supply their own prefix.
    pub fn cause(&self) -> String {
        match self {
            CoreError::Fetch { message, .. } | CoreError::Mutation { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// Returns `true` for errors that a plain retry might fix.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::Fetch {
                failure, status, ..
            }
            | CoreError::Mutation {
                failure, status, ..
            } => match failure {
                FailureKind::Connection | FailureKind::Timeout => true,
                FailureKind::Status => status.is_some_and(|s| s >= 500),
                FailureKind::NotFound | FailureKind::Decode => false,
            },
            _ => false,
        }
    }

    /// The remote failure classification, if this came from the API.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            CoreError::Fetch { failure, .. } | CoreError::Mutation { failure, .. } => {
                Some(*failure)
            }
            CoreError::ProductNotFound { .. } => Some(FailureKind::NotFound),
            _ => None,
        }
    }
}

fn classify(err: &storefront_api::Error) -> (FailureKind, Option<u16>) {
    use storefront_api::Error as ApiError;

    let failure = match err {
        ApiError::Timeout { .. } => FailureKind::Timeout,
        ApiError::Transport(e) if e.is_timeout() => FailureKind::Timeout,
        ApiError::Transport(_) | ApiError::InvalidUrl(_) | ApiError::Tls(_) => {
            FailureKind::Connection
        }
        ApiError::NotFound { .. } => FailureKind::NotFound,
        ApiError::Http { .. } => FailureKind::Status,
        ApiError::Deserialization { .. } => FailureKind::Decode,
    };
    (failure, err.status())
}

// ── Field-level validation ───────────────────────────────────────────

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Title,
    Price,
    Description,
    Category,
    CustomCategory,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Every field-level problem found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// First message recorded for `field`.
    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::Validation(errors)
    }
}
