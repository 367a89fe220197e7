//! ehrgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the ehrgen
//! EHR service generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           ehrgen-cli (CLI)              │
//! │     (Builds the GenerationRequest)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (PipelineOrchestrator, ProfileResolver) │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (DocumentSource, SpecParser, Stage, Fs) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    ehrgen-adapters (Infrastructure)     │
//! │ (HTTP/file loader, FHIR parser, stages) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ProfileSet, Overlay, GenerationRequest)│
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ehrgen_core::prelude::*;
//!
//! # fn run(pipeline: PipelineOrchestrator) -> EhrGenResult<()> {
//! let request = GenerationRequest::builder("./out")
//!     .capability_location(CapabilityLocation::parse("https://ehr.example/metadata")?)
//!     .build()?;
//!
//! let outcome = pipeline.run(request, &CancelToken::new())?;
//! println!("generated {}", outcome.artifacts.project_dir.display());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExecutionContext, PipelineOrchestrator, PipelineOutcome, PipelinePlan, PipelineSettings,
        ProfileSetResolver, StageRegistry,
        ports::{DocumentSource, Filesystem, ServiceStage, SpecParser, Stage, TemplateStage},
    };
    pub use crate::domain::{
        CancelToken, CapabilityDeclaration, CapabilityLocation, ConfigTree, GenerationRequest,
        GeneratorProperties, ImplementationGuideOverride, ProfileSet, ServiceArtifacts,
        ServiceOverrides, StageKind, TemplateStageSettings,
    };
    pub use crate::error::{EhrGenError, EhrGenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
