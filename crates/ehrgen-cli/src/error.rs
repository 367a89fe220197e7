//! CLI error type and exit code mapping.
//!
//! Every failure that reaches `main` is a [`CliError`]. It knows its exit
//! code, its suggestions, and how to render itself with or without colour.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use ehrgen_core::error::EhrGenError;

use ehrgen_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// The `--request` file does not exist.
    #[error("Request file not found: {}", path.display())]
    RequestFileNotFound { path: PathBuf },

    /// The `--request` file exists but is not a valid request.
    #[error("Invalid request file {}: {reason}", path.display())]
    InvalidRequestFile { path: PathBuf, reason: String },

    /// A configuration value could not be read or resolved.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// An error propagated from the generation pipeline.
    #[error("Generation failed: {0}")]
    Core(#[from] EhrGenError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Use --help for usage information".into()],

            Self::RequestFileNotFound { path } => vec![
                format!("Check that '{}' exists", path.display()),
                "Paths are resolved relative to the current directory".into(),
            ],

            Self::InvalidRequestFile { .. } => vec![
                "The request file must be a JSON object".into(),
                "Allowed keys: endpointName, projectName, organization, includedProfiles, \
                 dependentPackage, capabilityLocation, authMethod, outputLocation"
                    .into(),
            ],

            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use the form EHRGEN__SECTION__KEY".into(),
                "Use 'ehrgen config show' to see the effective configuration".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::InvalidRequestFile { .. } => {
                ErrorCategory::UserError
            }
            Self::RequestFileNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Headline shown to the user. A missing EHR name gets the wording
    /// users of the generator already know.
    fn headline(&self) -> String {
        match self {
            Self::Core(e) if e.is_missing_name() => "Cannot set ehr name from capability \
                statement. Manually set ehr name using --ehr-name option."
                .to_string(),
            other => other.to_string(),
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.headline().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`].
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self.headline()));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Convert foreign results into [`CliResult`] with a context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, serde_json::Error> {
    /// Serialization failures on our own types are internal errors.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: std::io::Error::other(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehrgen_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    #[test]
    fn exit_codes_follow_category() {
        assert_eq!(CliError::invalid_input("x").exit_code(), 2);
        assert_eq!(
            CliError::RequestFileNotFound {
                path: PathBuf::from("r.json")
            }
            .exit_code(),
            3
        );
        assert_eq!(CliError::config("x").exit_code(), 4);
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn core_categories_map_to_exit_codes() {
        let name = CliError::from(EhrGenError::from(DomainError::MissingName));
        assert_eq!(name.exit_code(), 2);

        let missing = CliError::from(EhrGenError::from(ApplicationError::NotFound {
            path: PathBuf::from("cs.json"),
        }));
        assert_eq!(missing.exit_code(), 3);
    }

    #[test]
    fn missing_name_uses_known_wording() {
        let err = CliError::from(EhrGenError::from(DomainError::MissingName));
        let text = err.format_plain(false);
        assert!(text.contains("Cannot set ehr name from capability statement"));
        assert!(text.contains("--ehr-name"));
    }

    #[test]
    fn request_file_suggestions_list_keys() {
        let err = CliError::InvalidRequestFile {
            path: PathBuf::from("r.json"),
            reason: "unknown field `ehrName`".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("endpointName")));
    }

    #[test]
    fn verbose_plain_output_shows_cause_without_hint() {
        let err = CliError::IoError {
            message: "writing".into(),
            source: io::Error::other("disk full"),
        };
        let text = err.format_plain(true);
        assert!(text.contains("Caused by: disk full"));
        assert!(!text.contains("--verbose"));
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading request");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
