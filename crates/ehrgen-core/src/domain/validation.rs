use crate::domain::{entities::generation::OutputTree, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_output_tree(tree: &OutputTree) -> Result<(), DomainError> {
        if tree.is_empty() {
            return Err(DomainError::invalid_argument(
                "output",
                "stage produced no files",
            ));
        }
        tree.validate()
    }

    /// Names used as directory names must be a single, non-hidden path
    /// component.
    pub fn validate_directory_name(field: &'static str, name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::invalid_argument(field, "name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(DomainError::invalid_argument(
                field,
                "name cannot start with '.'",
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::invalid_argument(
                field,
                "name cannot contain path separators",
            ));
        }
        Ok(())
    }
}
