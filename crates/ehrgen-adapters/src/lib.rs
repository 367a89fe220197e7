//! Infrastructure adapters for ehrgen.
//!
//! This crate implements the ports defined in `ehrgen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod document;
pub mod filesystem;
pub mod parser;
pub mod stages;
pub mod tool_config;

// Re-export commonly used adapters
pub use document::{CapabilityDocumentLoader, DEFAULT_FETCH_TIMEOUT, MemoryDocumentSource};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use parser::FhirJsonParser;
pub use stages::{PackageTemplateStage, PrebuiltServiceStage, register_builtin_stages};
pub use tool_config::{base_config, load_tool_config};
