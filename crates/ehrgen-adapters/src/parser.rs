//! FHIR JSON capability statement parser.
//!
//! Only the fields the generator reads are modelled; everything else in the
//! document is ignored.

use ehrgen_core::{
    application::{ApplicationError, ports::SpecParser},
    domain::{CapabilityDeclaration, ResourceEntry, RestSection},
    error::EhrGenResult,
};
use serde::Deserialize;
use tracing::{debug, instrument};

const CAPABILITY_STATEMENT: &str = "CapabilityStatement";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCapabilityStatement {
    resource_type: Option<String>,
    publisher: Option<String>,
    #[serde(default)]
    rest: Vec<RawRest>,
}

#[derive(Debug, Deserialize)]
struct RawRest {
    #[serde(default)]
    resource: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    supported_profile: Vec<String>,
}

/// [`SpecParser`] for FHIR R4 `CapabilityStatement` JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct FhirJsonParser;

impl FhirJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl SpecParser for FhirJsonParser {
    #[instrument(skip(self, source))]
    fn parse(&self, source: &str, origin: &str) -> EhrGenResult<CapabilityDeclaration> {
        let parse_error = |reason: String| ApplicationError::Parse {
            location: origin.to_string(),
            reason,
        };

        let raw: RawCapabilityStatement =
            serde_json::from_str(source).map_err(|e| parse_error(e.to_string()))?;

        match raw.resource_type.as_deref() {
            Some(CAPABILITY_STATEMENT) => {}
            Some(other) => {
                return Err(parse_error(format!(
                    "expected resourceType '{CAPABILITY_STATEMENT}', found '{other}'"
                ))
                .into());
            }
            None => return Err(parse_error("missing resourceType".into()).into()),
        }

        let rest: Vec<RestSection> = raw
            .rest
            .into_iter()
            .map(|r| RestSection {
                resources: r
                    .resource
                    .into_iter()
                    .map(|res| ResourceEntry::new(res.resource_type, res.supported_profile))
                    .collect(),
            })
            .collect();
        debug!(rest_sections = rest.len(), "Parsed capability statement");

        Ok(CapabilityDeclaration {
            publisher: raw.publisher,
            rest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehrgen_core::error::EhrGenError;

    fn parse(text: &str) -> EhrGenResult<CapabilityDeclaration> {
        FhirJsonParser::new().parse(text, "cs.json")
    }

    #[test]
    fn reads_publisher_and_profiles() {
        let decl = parse(
            r#"{
                "resourceType": "CapabilityStatement",
                "publisher": "Acme",
                "status": "active",
                "rest": [
                    { "mode": "server", "resource": [
                        { "type": "Patient", "supportedProfile": ["P1", "P2"] },
                        { "type": "Encounter" }
                    ] },
                    { "resource": [ { "type": "Patient", "supportedProfile": ["Z"] } ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(decl.publisher_name(), Some("Acme"));
        assert_eq!(decl.rest.len(), 2);
        assert_eq!(decl.supported_profiles().collect::<Vec<_>>(), vec!["P1", "P2"]);
    }

    #[test]
    fn statement_without_rest_is_valid() {
        let decl = parse(r#"{ "resourceType": "CapabilityStatement" }"#).unwrap();
        assert!(decl.rest.is_empty());
        assert_eq!(decl.publisher_name(), None);
    }

    #[test]
    fn rejects_other_resources_and_bad_json() {
        for text in [
            r#"{ "resourceType": "Patient" }"#,
            r#"{ "publisher": "Acme" }"#,
            "not json",
        ] {
            let err = parse(text).unwrap_err();
            assert!(
                matches!(err, EhrGenError::Application(ApplicationError::Parse { .. })),
                "{text}"
            );
        }
    }
}
