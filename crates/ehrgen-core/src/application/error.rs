//! Application layer errors.
//!
//! These errors represent failures in orchestration and at the ports, not
//! domain rule violations. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::StageKind;
use crate::error::ErrorCategory;

/// Errors that occur during pipeline orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Remote capability statement could not be retrieved (HTTP error,
    /// timeout, DNS failure) or a local one could not be read.
    #[error("Failed to fetch capability statement from {location}: {reason}")]
    Fetch { location: String, reason: String },

    /// Local capability statement path does not exist.
    #[error("Capability statement file does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Document is not a parseable capability statement.
    #[error("Failed to parse capability statement from {location}: {reason}")]
    Parse { location: String, reason: String },

    /// No implementation registered for a pipeline stage.
    #[error("Failed to load the '{stage}' generation stage: {reason}")]
    ToolLoad { stage: StageKind, reason: String },

    /// A stage failed while configuring or generating.
    #[error("The '{stage}' generation stage failed: {reason}")]
    StageExecution { stage: StageKind, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The run was cancelled or its deadline passed.
    #[error("Operation cancelled: {reason}")]
    Cancelled { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Fetch { location, .. } => vec![
                format!("Could not read: {}", location),
                "Check the URL and your network connection".into(),
                "Or download the capability statement and pass the file path".into(),
            ],
            Self::NotFound { path } => vec![
                format!("No file at: {}", path.display()),
                "Check the --capability-statement path".into(),
            ],
            Self::Parse { .. } => vec![
                "The document must be a FHIR CapabilityStatement in JSON format".into(),
                "Check that 'resourceType' is \"CapabilityStatement\"".into(),
            ],
            Self::ToolLoad { stage, .. } => vec![
                format!("The '{}' stage is not available in this build", stage),
                "This is likely a packaging error, please report it".into(),
            ],
            Self::StageExecution { .. } => vec![
                "Files written before the failure are left in place".into(),
                "Re-run with -v for details".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::Cancelled { .. } => vec!["The run stopped before completion".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Fetch { .. } | Self::Parse { .. } => ErrorCategory::Validation,
            Self::ToolLoad { .. } => ErrorCategory::Configuration,
            Self::StageExecution { .. } | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::Cancelled { .. } => ErrorCategory::Validation,
        }
    }

    /// Failures reading the capability statement degrade gracefully: the run
    /// continues with the profiles it already has.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::NotFound { .. } | Self::Parse { .. }
        )
    }
}
