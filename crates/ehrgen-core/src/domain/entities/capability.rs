//! Capability declaration model.
//!
//! The subset of a FHIR `CapabilityStatement` the generator cares about:
//! the publisher and, per REST section, the resources with their supported
//! profiles. Produced once by a `SpecParser` adapter and read-only afterwards.

/// A parsed capability declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityDeclaration {
    pub publisher: Option<String>,
    pub rest: Vec<RestSection>,
}

/// One `rest` entry of the declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestSection {
    pub resources: Vec<ResourceEntry>,
}

/// One resource listed in a `rest` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub resource_type: String,
    pub supported_profiles: Vec<String>,
}

impl ResourceEntry {
    pub fn new<I, S>(resource_type: impl Into<String>, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_type: resource_type.into(),
            supported_profiles: profiles.into_iter().map(Into::into).collect(),
        }
    }
}

impl CapabilityDeclaration {
    /// Supported profiles of the first `rest` section, in declaration order.
    ///
    /// Later sections are ignored. Duplicates are not removed here; that is
    /// the job of `ProfileSet`.
    pub fn supported_profiles(&self) -> impl Iterator<Item = &str> {
        self.rest
            .first()
            .into_iter()
            .flat_map(|rest| rest.resources.iter())
            .flat_map(|resource| resource.supported_profiles.iter())
            .map(String::as_str)
    }

    /// Publisher, if present and not blank.
    pub fn publisher_name(&self) -> Option<&str> {
        self.publisher
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
