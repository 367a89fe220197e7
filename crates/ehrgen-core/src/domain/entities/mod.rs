pub mod capability;
pub mod common;
pub mod config_tree;
pub mod generation;
pub mod overlay;
pub mod profile_set;
pub mod render;
pub mod request;

pub use crate::domain::DomainError;
pub use capability::CapabilityDeclaration;
pub use overlay::ImplementationGuideOverride;
pub use profile_set::ProfileSet;
pub use request::GenerationRequest;
