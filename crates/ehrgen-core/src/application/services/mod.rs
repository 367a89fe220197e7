//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve profiles" or "run the pipeline".

pub mod pipeline;
pub mod profile_resolver;
pub mod registry;

pub use pipeline::{
    PipelineOrchestrator, PipelineOutcome, PipelinePlan, PipelineSettings, TEMPLATE_CONFIG_PATH,
};
pub use profile_resolver::{ProfileSetResolver, Resolution};
pub use registry::StageRegistry;
