//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use storefront_config::ConfigError;
use storefront_core::{CoreError, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the product API")]
    #[diagnostic(
        code(storefront::connection_failed),
        help(
            "{reason}\n\
             Check the API URL with: storefront config show\n\
             Or override it with --api-url"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("{message}")]
    #[diagnostic(
        code(storefront::timeout),
        help("Increase the timeout with --timeout or check the API's responsiveness.")
    )]
    Timeout { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(storefront::not_found),
        help("Run: storefront {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error: {message}")]
    #[diagnostic(code(storefront::api_error))]
    ApiError { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(storefront::submit_failed),
        help("Your field values were kept. Run the command again to retry.")
    )]
    SubmissionFailed { message: String },

    #[error("{alert}")]
    #[diagnostic(code(storefront::delete_failed))]
    DeletionFailed { alert: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(storefront::validation))]
    Validation { field: String, reason: String },

    #[error("The product form is incomplete")]
    #[diagnostic(
        code(storefront::invalid_form),
        help("{errors}\nPass the missing fields as flags, or run on a terminal to be prompted.")
    )]
    InvalidForm { errors: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(storefront::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: storefront config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(storefront::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(storefront::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(storefront::prompt))]
    Prompt(String),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("{0}")]
    #[diagnostic(code(storefront::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::InvalidForm { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Prompt(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound { id } => not_found_product(id),

            CoreError::Fetch {
                message, failure, ..
            }
            | CoreError::Mutation {
                message, failure, ..
            } => match failure {
                FailureKind::Connection => CliError::ConnectionFailed { reason: message },
                FailureKind::Timeout => CliError::Timeout { message },
                FailureKind::NotFound => not_found_product(message),
                FailureKind::Status | FailureKind::Decode => CliError::ApiError { message },
            },

            CoreError::Validation(errors) => CliError::InvalidForm {
                errors: errors
                    .iter()
                    .map(|e| format!("  {}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other @ (CoreError::FormLocked { .. }
            | CoreError::FlowBusy { .. }
            | CoreError::InvalidTransition { .. }
            | CoreError::Disposed
            | CoreError::ServiceStopped
            | CoreError::Internal(_)) => CliError::Internal(other.to_string()),
        }
    }
}

fn not_found_product(identifier: String) -> CliError {
    CliError::NotFound {
        resource_type: "product".into(),
        identifier,
        list_command: "products list".into(),
    }
}
