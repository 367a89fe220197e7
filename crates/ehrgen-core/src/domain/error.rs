//! Domain errors.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they are recorded as run warnings and re-reported)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Invalid configuration path '{path}': {reason}")]
    InvalidConfigPath { path: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Duplicate path in generated output: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    /// No endpoint name was supplied and none could be inferred from the
    /// capability statement publisher.
    #[error("EHR name is not set and could not be inferred from the capability statement")]
    MissingName,
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidArgument`].
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingName => vec![
                "Set the EHR name manually using the --ehr-name option".into(),
                "Or provide a capability statement whose 'publisher' is populated".into(),
            ],
            Self::InvalidArgument { field, reason } => vec![
                format!("Check the value given for '{}'", field),
                format!("Details: {}", reason),
            ],
            Self::InvalidConfigPath { path, .. } => vec![
                format!("The tool configuration has no usable value at '{}'", path),
                "Check the base tool configuration file".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } | Self::MissingName => ErrorCategory::Validation,
            Self::InvalidConfigPath { .. } => ErrorCategory::Configuration,
            Self::AbsolutePathNotAllowed { .. } | Self::DuplicatePath { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Internal,
}
