//! Built-in README templates rendered by the stages.
//!
//! Placeholders are `{{SCREAMING_SNAKE_CASE}}`, see `RenderContext`. TOML
//! manifests are serialized from structs instead, so values are escaped.

pub(crate) const PACKAGE_README: &str = r#"# {{PACKAGE_NAME}}

FHIR package for the `{{IG_NAME}}` implementation guide, generated by ehrgen
{{GENERATOR_VERSION}}.

Import it with `{{IMPORT_PATH}}`.

## Profiles

{{PROFILE_LIST}}
"#;

pub(crate) const SERVICE_README: &str = r#"# {{PROJECT_NAME}}

Prebuilt FHIR service for the {{EHR_NAME}} EHR.

- Package: `{{IMPORT_PATH}}` ({{PACKAGE_PATH}})
- Authentication: {{AUTH_METHOD}}
- Generated: {{GENERATED_AT}}
"#;
