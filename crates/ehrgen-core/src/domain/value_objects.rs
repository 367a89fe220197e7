//! Domain value objects: CapabilityLocation, StageKind.
//!
//! These are pure value types with equality-by-value and no identity.
//! This file defines the types, their string representations, and their
//! parsers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::error::DomainError;

// ── CapabilityLocation ───────────────────────────────────────────────────────

/// Where a capability statement is read from.
///
/// Strings that parse as an `http`/`https` URL are remote; everything else is
/// treated as a local file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityLocation {
    Remote(Url),
    Local(PathBuf),
}

impl CapabilityLocation {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_argument(
                "capability statement",
                "location cannot be empty",
            ));
        }

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            _ => Ok(Self::Local(PathBuf::from(trimmed))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for CapabilityLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

impl FromStr for CapabilityLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── StageKind ────────────────────────────────────────────────────────────────

/// The two stages of the generation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Package/template generation from the implementation-guide overlay.
    Template,
    /// Prebuilt EHR service generation wired against the template package.
    Service,
}

impl StageKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Service => "ehr-service-gen",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_and_https_are_remote() {
        let http = CapabilityLocation::parse("http://ehr.example.org/metadata").unwrap();
        let https = CapabilityLocation::parse("https://ehr.example.org/fhir/metadata").unwrap();
        assert!(http.is_remote());
        assert!(https.is_remote());
    }

    #[test]
    fn plain_paths_are_local() {
        let loc = CapabilityLocation::parse("./capability.json").unwrap();
        assert_eq!(
            loc,
            CapabilityLocation::Local(PathBuf::from("./capability.json"))
        );
    }

    #[test]
    fn non_http_schemes_are_local() {
        // A file named like "httpd.json" or a `file:` URL is not fetched remotely.
        assert!(!CapabilityLocation::parse("httpd.json").unwrap().is_remote());
        assert!(
            !CapabilityLocation::parse("file:///tmp/cs.json")
                .unwrap()
                .is_remote()
        );
    }

    #[test]
    fn empty_location_is_rejected() {
        assert!(matches!(
            CapabilityLocation::parse("   "),
            Err(DomainError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn stage_kind_names() {
        assert_eq!(StageKind::Template.to_string(), "template");
        assert_eq!(StageKind::Service.to_string(), "ehr-service-gen");
    }
}
