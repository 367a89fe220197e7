//! In-memory document source for testing.

use std::collections::HashMap;

use ehrgen_core::{
    application::{ApplicationError, ports::DocumentSource},
    domain::{CancelToken, CapabilityLocation},
    error::EhrGenResult,
};

/// Serves documents registered by location.
///
/// Unknown local paths are `NotFound`, unknown URLs are `Fetch` errors,
/// mirroring [`super::CapabilityDocumentLoader`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    documents: HashMap<String, String>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: &CapabilityLocation, text: impl Into<String>) -> Self {
        self.documents.insert(location.to_string(), text.into());
        self
    }
}

impl DocumentSource for MemoryDocumentSource {
    fn load(&self, location: &CapabilityLocation, token: &CancelToken) -> EhrGenResult<String> {
        if token.is_cancelled() {
            return Err(ApplicationError::Cancelled {
                reason: format!("stopped before reading {location}"),
            }
            .into());
        }
        if let Some(text) = self.documents.get(&location.to_string()) {
            return Ok(text.clone());
        }
        let err = match location {
            CapabilityLocation::Local(path) => ApplicationError::NotFound { path: path.clone() },
            CapabilityLocation::Remote(url) => ApplicationError::Fetch {
                location: url.to_string(),
                reason: "server responded with 404 Not Found".into(),
            },
        };
        Err(err.into())
    }
}
