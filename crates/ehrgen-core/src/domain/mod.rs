//! Core domain layer for ehrgen.
//!
//! This module contains pure logic: profile sets, implementation-guide
//! overlays, generation requests, and the configuration tree the stages are
//! configured from. Network, filesystem, and parsing concerns are handled
//! via ports (traits) defined in the application layer.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: overlays and declarations are read-only once built

// Public API - what the world sees
pub mod common;
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use common::CancelToken;
pub use entities::{
    capability::{CapabilityDeclaration, ResourceEntry, RestSection},
    common::RelativePath,
    config_tree::{ConfigPatch, ConfigTree},
    generation::{
        GeneratedFile, GeneratorProperties, OutputTree, ServiceArtifacts, ServiceOverrides,
        TemplateStageSettings,
    },
    overlay::{
        DEFAULT_IG_NAME, DEFAULT_ORGANIZATION, ImplementationGuideOverride, OverlayConfigBuilder,
    },
    profile_set::ProfileSet,
    render::{RenderContext, to_kebab_case, to_snake_case},
    request::{GenerationRequest, GenerationRequestBuilder, PROJECT_NAME_SUFFIX},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{CapabilityLocation, StageKind};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Profile merge properties
    // ========================================================================

    fn declaration() -> CapabilityDeclaration {
        CapabilityDeclaration {
            publisher: Some("Acme".into()),
            rest: vec![RestSection {
                resources: vec![
                    ResourceEntry::new("Patient", ["P1", "P2"]),
                    ResourceEntry::new("Observation", ["P2", "P3"]),
                ],
            }],
        }
    }

    #[test]
    fn merging_declaration_twice_is_idempotent() {
        let decl = declaration();
        let mut set = ProfileSet::new();
        set.merge(decl.supported_profiles());
        let first = set.clone();
        set.merge(decl.supported_profiles());

        assert_eq!(set, first);
        assert_eq!(set.to_vec(), vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn prior_profiles_keep_their_position() {
        let mut set: ProfileSet = ["P3", "X"].into_iter().collect();
        set.merge(declaration().supported_profiles());
        assert_eq!(set.to_vec(), vec!["P3", "X", "P1", "P2"]);
    }

    // ========================================================================
    // Overlay over configuration tree
    // ========================================================================

    #[test]
    fn overlay_patch_lands_at_ig_config() {
        let ig = OverlayConfigBuilder::build(
            DEFAULT_IG_NAME,
            None,
            declaration().supported_profiles().collect(),
            ProfileSet::new(),
        )
        .unwrap();

        let mut tree = ConfigTree::default();
        tree.apply(&[ConfigPatch::new("project.package.igConfig", ig.to_json())])
            .unwrap();

        assert_eq!(
            tree.get("project.package.igConfig.importStatement"),
            Some(&serde_json::json!(format!(
                "{DEFAULT_ORGANIZATION}/{DEFAULT_IG_NAME}"
            )))
        );
        assert_eq!(
            tree.get("project.package.igConfig.includedProfiles"),
            Some(&serde_json::json!(["P1", "P2", "P3"]))
        );
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn directory_names_are_single_components() {
        assert!(DomainValidator::validate_directory_name("project name", "acme-service").is_ok());
        assert!(DomainValidator::validate_directory_name("project name", "../x").is_err());
        assert!(DomainValidator::validate_directory_name("project name", ".hidden").is_err());
        assert!(DomainValidator::validate_directory_name("project name", "").is_err());
    }

    #[test]
    fn empty_output_tree_is_invalid() {
        assert!(DomainValidator::validate_output_tree(&OutputTree::new()).is_err());
    }
}
