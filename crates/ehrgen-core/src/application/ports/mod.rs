//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `ehrgen-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DocumentSource`: capability statement retrieval (file or HTTP)
//!   - `SpecParser`: capability statement parsing
//!   - `Filesystem`: File operations
//!   - `Stage`: the two generation stages

pub mod output;

pub use output::{DocumentSource, Filesystem, ServiceStage, SpecParser, Stage, TemplateStage};
