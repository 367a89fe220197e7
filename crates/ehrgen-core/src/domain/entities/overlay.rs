//! Implementation-guide override record and its builder.

use serde::{Deserialize, Serialize};

use crate::domain::{entities::profile_set::ProfileSet, error::DomainError};

/// Organization used in the import path when none is supplied.
pub const DEFAULT_ORGANIZATION: &str = "healthcare";

/// Implementation-guide name used for the generated EHR package.
pub const DEFAULT_IG_NAME: &str = "ehr";

/// The implementation-guide selection patched into the template stage's
/// configuration at `project.package.igConfig`.
///
/// Immutable once built. The serialized field names are the ones the
/// template stage's configuration schema expects. Deserializing applies the
/// same name check as [`OverlayConfigBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OverrideRecord")]
pub struct ImplementationGuideOverride {
    #[serde(rename = "implementationGuide")]
    name: String,
    #[serde(rename = "importStatement")]
    import_path: String,
    #[serde(rename = "enable")]
    enabled: bool,
    #[serde(rename = "includedProfiles")]
    included_profiles: ProfileSet,
    #[serde(rename = "excludedProfiles")]
    excluded_profiles: ProfileSet,
}

/// Unchecked wire form of [`ImplementationGuideOverride`].
#[derive(Deserialize)]
struct OverrideRecord {
    #[serde(rename = "implementationGuide")]
    name: String,
    #[serde(rename = "importStatement")]
    import_path: String,
    #[serde(rename = "enable")]
    enabled: bool,
    #[serde(rename = "includedProfiles")]
    included_profiles: ProfileSet,
    #[serde(rename = "excludedProfiles")]
    excluded_profiles: ProfileSet,
}

impl TryFrom<OverrideRecord> for ImplementationGuideOverride {
    type Error = DomainError;

    fn try_from(record: OverrideRecord) -> Result<Self, Self::Error> {
        let name = checked_name(&record.name)?;
        if record.import_path.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "import statement",
                "import statement cannot be empty",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            import_path: record.import_path,
            enabled: record.enabled,
            included_profiles: record.included_profiles,
            excluded_profiles: record.excluded_profiles,
        })
    }
}

fn checked_name(name: &str) -> Result<&str, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::invalid_argument(
            "implementation guide name",
            "name cannot be empty",
        ));
    }
    Ok(name)
}

impl ImplementationGuideOverride {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn included_profiles(&self) -> &ProfileSet {
        &self.included_profiles
    }

    pub fn excluded_profiles(&self) -> &ProfileSet {
        &self.excluded_profiles
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Serializing plain strings and bools cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Assembles [`ImplementationGuideOverride`] records.
pub struct OverlayConfigBuilder;

impl OverlayConfigBuilder {
    /// Build an override for `name`.
    ///
    /// `import_path` is `<organization>/<name>`, falling back to
    /// [`DEFAULT_ORGANIZATION`] when no organization is given. The override
    /// is always enabled.
    pub fn build(
        name: &str,
        organization: Option<&str>,
        included: ProfileSet,
        excluded: ProfileSet,
    ) -> Result<ImplementationGuideOverride, DomainError> {
        let name = checked_name(name)?;

        let organization = organization
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(DEFAULT_ORGANIZATION);

        Ok(ImplementationGuideOverride {
            name: name.to_string(),
            import_path: format!("{organization}/{name}"),
            enabled: true,
            included_profiles: included,
            excluded_profiles: excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_path_uses_organization() {
        let ig = OverlayConfigBuilder::build(
            "CarinBB",
            Some("orgx"),
            ProfileSet::new(),
            ProfileSet::new(),
        )
        .unwrap();
        assert_eq!(ig.import_path(), "orgx/CarinBB");
        assert!(ig.enabled());
    }

    #[test]
    fn import_path_falls_back_to_default_org() {
        let ig =
            OverlayConfigBuilder::build("CarinBB", None, ProfileSet::new(), ProfileSet::new())
                .unwrap();
        assert_eq!(ig.import_path(), format!("{DEFAULT_ORGANIZATION}/CarinBB"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = OverlayConfigBuilder::build(" ", None, ProfileSet::new(), ProfileSet::new());
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[test]
    fn deserializing_blank_name_is_rejected() {
        let result: Result<ImplementationGuideOverride, _> = serde_json::from_value(
            serde_json::json!({
                "implementationGuide": "  ",
                "importStatement": "acme/ehr",
                "enable": true,
                "includedProfiles": [],
                "excludedProfiles": []
            }),
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("name cannot be empty"), "{err}");
    }

    #[test]
    fn deserialized_override_matches_built_one() {
        let ig = OverlayConfigBuilder::build("ehr", Some("acme"), ProfileSet::new(), ProfileSet::new())
            .unwrap();
        let back: ImplementationGuideOverride = serde_json::from_value(ig.to_json()).unwrap();
        assert_eq!(back, ig);
    }

    #[test]
    fn wire_shape() {
        let included: ProfileSet = ["P1", "P2"].into_iter().collect();
        let ig = OverlayConfigBuilder::build("ehr", Some("acme"), included, ProfileSet::new())
            .unwrap();

        assert_eq!(
            ig.to_json(),
            serde_json::json!({
                "implementationGuide": "ehr",
                "importStatement": "acme/ehr",
                "enable": true,
                "includedProfiles": ["P1", "P2"],
                "excludedProfiles": []
            })
        );
    }
}
