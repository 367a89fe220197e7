//! Application layer for ehrgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (PipelineOrchestrator, ProfileSetResolver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Context**: Per-run state shared by the stages
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod context;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    PipelineOrchestrator, PipelineOutcome, PipelinePlan, PipelineSettings, ProfileSetResolver,
    Resolution, StageRegistry,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DocumentSource, Filesystem, ServiceStage, SpecParser, Stage, TemplateStage};

pub use context::{ExecutionContext, GENERATOR_PROPERTIES_KEY};
pub use error::ApplicationError;
