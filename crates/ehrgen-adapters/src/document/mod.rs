//! Document source adapters.

mod loader;
mod memory;

pub use loader::{CapabilityDocumentLoader, DEFAULT_FETCH_TIMEOUT};
pub use memory::MemoryDocumentSource;
