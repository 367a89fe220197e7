//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `ehrgen-adapters` crate provides implementations.

use std::path::Path;

use crate::application::context::ExecutionContext;
use crate::domain::{
    CancelToken, CapabilityDeclaration, CapabilityLocation, GeneratorProperties,
    ServiceArtifacts, ServiceOverrides, StageKind, TemplateStageSettings,
};
use crate::error::EhrGenResult;

/// Port for reading a capability statement document as text.
///
/// Implemented by:
/// - `ehrgen_adapters::CapabilityDocumentLoader` (local files and HTTP)
/// - `ehrgen_adapters::MemoryDocumentSource` (testing)
///
/// Errors:
/// - `ApplicationError::Fetch` for network/IO failures
/// - `ApplicationError::NotFound` for a missing local file
/// - `ApplicationError::Cancelled` when `token` is already cancelled
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource: Send + Sync {
    fn load(&self, location: &CapabilityLocation, token: &CancelToken) -> EhrGenResult<String>;
}

/// Port for turning document text into a [`CapabilityDeclaration`].
///
/// `origin` is only used in error messages. Documents that are not a
/// capability statement fail with `ApplicationError::Parse`.
#[cfg_attr(test, mockall::automock)]
pub trait SpecParser: Send + Sync {
    fn parse(&self, source: &str, origin: &str) -> EhrGenResult<CapabilityDeclaration>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ehrgen_adapters::filesystem::LocalFilesystem` (production)
/// - `ehrgen_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> EhrGenResult<()>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> EhrGenResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// One configurable, executable unit of the generation pipeline.
///
/// A stage is configured once, then executed against the run's shared
/// [`ExecutionContext`]. `Input` is the typed payload handed over from the
/// previous stage.
pub trait Stage: Send {
    type Settings;
    type Input;
    type Output;

    fn kind(&self) -> StageKind;

    fn configure(&mut self, settings: Self::Settings) -> EhrGenResult<()>;

    fn execute(
        &mut self,
        ctx: &mut ExecutionContext,
        input: &Self::Input,
    ) -> EhrGenResult<Self::Output>;
}

/// Stage one: package generation from the implementation-guide overlay.
pub type TemplateStage =
    dyn Stage<Settings = TemplateStageSettings, Input = (), Output = GeneratorProperties>;

/// Stage two: prebuilt service generation wired to stage one's package.
pub type ServiceStage =
    dyn Stage<Settings = ServiceOverrides, Input = GeneratorProperties, Output = ServiceArtifacts>;
