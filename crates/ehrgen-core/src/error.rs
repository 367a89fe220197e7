//! Unified error handling for ehrgen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for ehrgen core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EhrGenError {
    /// Errors from the domain layer (rule violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration and port failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl EhrGenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// `true` for capability statement failures the pipeline reports and
    /// continues past.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Application(e) if e.is_recoverable())
    }

    /// `true` when no endpoint name could be determined.
    pub fn is_missing_name(&self) -> bool {
        matches!(self, Self::Domain(DomainError::MissingName))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type EhrGenResult<T> = Result<T, EhrGenError>;
