//! Stage inputs and outputs.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{common::RelativePath, config_tree::ConfigTree, profile_set::ProfileSet},
    error::DomainError,
};

/// Configuration handed to the template stage: the base configuration slice
/// with the implementation-guide overlay (and dependent package patches)
/// already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateStageSettings {
    pub config: ConfigTree,
}

/// Metadata emitted by the template stage and consumed by the service stage
/// to wire the generated service against the generated package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorProperties {
    pub package_name: String,
    pub organization: String,
    pub version: String,
    pub implementation_guide: String,
    pub import_path: String,
    pub included_profiles: ProfileSet,
    pub dependent_package: Option<String>,
    /// Package directory, relative to the run's output directory.
    pub package_dir: PathBuf,
    pub generated_at: DateTime<Utc>,
}

/// Scalar overrides for the service stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOverrides {
    pub project_name: String,
    pub ehr_name: String,
    pub auth_method: Option<String>,
}

/// What the service stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceArtifacts {
    /// Service project directory, relative to the run's output directory.
    pub project_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Files a stage wants written below the run's output directory.
#[derive(Debug, Clone, Default)]
pub struct OutputTree {
    files: Vec<GeneratedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        self.files.push(GeneratedFile {
            path: RelativePath::try_new(path)?,
            content: content.into(),
        });
        Ok(self)
    }

    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// No two files may share a path.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }
}
