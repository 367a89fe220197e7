//! Caller-supplied generation parameters.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{profile_set::ProfileSet, render::to_kebab_case},
    error::DomainError,
    validation::DomainValidator,
    value_objects::CapabilityLocation,
};

/// Suffix appended to the endpoint name to derive a default project name.
pub const PROJECT_NAME_SUFFIX: &str = "-service";

/// Everything the caller asked for in one generation run.
///
/// Built with [`GenerationRequest::builder`]. The default project name
/// (`<endpoint name>-service`) is computed on first read, not at
/// construction, so an endpoint name inferred later from the capability
/// statement is taken into account.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    endpoint_name: Option<String>,
    project_name: Option<String>,
    derived_project_name: OnceCell<String>,
    organization: Option<String>,
    included_profiles: ProfileSet,
    dependent_package: Option<String>,
    capability_location: Option<CapabilityLocation>,
    auth_method: Option<String>,
    output_dir: PathBuf,
}

impl GenerationRequest {
    pub fn builder(output_dir: impl Into<PathBuf>) -> GenerationRequestBuilder {
        GenerationRequestBuilder::new(output_dir)
    }

    pub fn endpoint_name(&self) -> Option<&str> {
        self.endpoint_name.as_deref()
    }

    /// Explicit project name, or `<endpoint name>-service`.
    ///
    /// An endpoint name that is not a usable directory component (a
    /// publisher such as `HL7 International / Cross-Group Projects`) is
    /// kebab-cased first. The endpoint name itself is left untouched.
    ///
    /// Fails with [`DomainError::MissingName`] when neither is known yet.
    pub fn project_name(&self) -> Result<&str, DomainError> {
        if let Some(name) = &self.project_name {
            return Ok(name.as_str());
        }
        if let Some(name) = self.derived_project_name.get() {
            return Ok(name.as_str());
        }
        let endpoint = self.endpoint_name.as_deref().ok_or(DomainError::MissingName)?;
        Ok(self
            .derived_project_name
            .get_or_init(|| default_project_name(endpoint))
            .as_str())
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn included_profiles(&self) -> &ProfileSet {
        &self.included_profiles
    }

    pub fn dependent_package(&self) -> Option<&str> {
        self.dependent_package.as_deref()
    }

    pub fn capability_location(&self) -> Option<&CapabilityLocation> {
        self.capability_location.as_ref()
    }

    pub fn auth_method(&self) -> Option<&str> {
        self.auth_method.as_deref()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Record a name inferred from the capability statement.
    ///
    /// An explicitly supplied endpoint name always wins.
    pub(crate) fn adopt_inferred_name(&mut self, name: &str) {
        if self.endpoint_name.is_none() {
            self.endpoint_name = Some(name.to_string());
            self.derived_project_name = OnceCell::new();
        }
    }
}

/// Builder for [`GenerationRequest`].
#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    endpoint_name: Option<String>,
    project_name: Option<String>,
    organization: Option<String>,
    included_profiles: ProfileSet,
    dependent_package: Option<String>,
    capability_location: Option<CapabilityLocation>,
    auth_method: Option<String>,
    output_dir: PathBuf,
}

impl GenerationRequestBuilder {
    fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            endpoint_name: None,
            project_name: None,
            organization: None,
            included_profiles: ProfileSet::new(),
            dependent_package: None,
            capability_location: None,
            auth_method: None,
            output_dir: output_dir.into(),
        }
    }

    pub fn endpoint_name(mut self, name: impl Into<String>) -> Self {
        self.endpoint_name = Some(name.into());
        self
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    pub fn included_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_profiles.merge(profiles);
        self
    }

    pub fn dependent_package(mut self, package: impl Into<String>) -> Self {
        self.dependent_package = Some(package.into());
        self
    }

    pub fn capability_location(mut self, location: CapabilityLocation) -> Self {
        self.capability_location = Some(location);
        self
    }

    pub fn auth_method(mut self, method: impl Into<String>) -> Self {
        self.auth_method = Some(method.into());
        self
    }

    pub fn build(self) -> Result<GenerationRequest, DomainError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(DomainError::invalid_argument(
                "output",
                "output location cannot be empty",
            ));
        }

        Ok(GenerationRequest {
            endpoint_name: non_blank("ehr name", self.endpoint_name)?,
            project_name: non_blank("project name", self.project_name)?,
            derived_project_name: OnceCell::new(),
            organization: non_blank("org name", self.organization)?,
            included_profiles: self.included_profiles,
            dependent_package: non_blank("dependent package", self.dependent_package)?,
            capability_location: self.capability_location,
            auth_method: non_blank("auth method", self.auth_method)?,
            output_dir: self.output_dir,
        })
    }
}

fn default_project_name(endpoint: &str) -> String {
    let base = match DomainValidator::validate_directory_name("project name", endpoint) {
        Ok(()) => endpoint.to_string(),
        Err(_) => to_kebab_case(endpoint),
    };
    format!("{base}{PROJECT_NAME_SUFFIX}")
}

/// A supplied value must not be blank; an absent one stays absent.
fn non_blank(field: &'static str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(DomainError::invalid_argument(
            field,
            "value cannot be empty",
        )),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}
