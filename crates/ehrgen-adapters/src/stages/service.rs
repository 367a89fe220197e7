//! Stage two: prebuilt EHR service generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ehrgen_core::{
    application::{ExecutionContext, ports::{Filesystem, Stage}},
    domain::{
        GeneratorProperties, OutputTree, RenderContext, ServiceArtifacts, ServiceOverrides,
        StageKind,
    },
    error::EhrGenResult,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};

use super::{not_configured, serialization_failure, templates};
use crate::filesystem::write_tree;

/// Auth method recorded when none is requested.
pub const DEFAULT_AUTH_METHOD: &str = "none";

/// `Service.toml` layout.
#[derive(Serialize)]
struct ServiceManifest<'a> {
    service: ServiceSection<'a>,
    dependencies: ServiceDependencies<'a>,
}

#[derive(Serialize)]
struct ServiceSection<'a> {
    name: &'a str,
    ehr: &'a str,
    auth: &'a str,
}

#[derive(Serialize)]
struct ServiceDependencies<'a> {
    package: PackageReference<'a>,
}

#[derive(Serialize)]
struct PackageReference<'a> {
    org: &'a str,
    name: &'a str,
    version: &'a str,
    path: &'a str,
}

/// Writes `<out>/<project>/` with `Service.toml`, `service.json` and a
/// README, wired to the package produced by stage one.
pub struct PrebuiltServiceStage {
    fs: Arc<dyn Filesystem>,
    overrides: Option<ServiceOverrides>,
}

impl PrebuiltServiceStage {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            overrides: None,
        }
    }
}

impl Stage for PrebuiltServiceStage {
    type Settings = ServiceOverrides;
    type Input = GeneratorProperties;
    type Output = ServiceArtifacts;

    fn kind(&self) -> StageKind {
        StageKind::Service
    }

    fn configure(&mut self, settings: ServiceOverrides) -> EhrGenResult<()> {
        self.overrides = Some(settings);
        Ok(())
    }

    #[instrument(skip_all, fields(run_id = %ctx.run_id(), package = %input.package_name))]
    fn execute(
        &mut self,
        ctx: &mut ExecutionContext,
        input: &GeneratorProperties,
    ) -> EhrGenResult<ServiceArtifacts> {
        let overrides = self
            .overrides
            .as_ref()
            .ok_or_else(|| not_configured(StageKind::Service))?;

        let project_dir = PathBuf::from(&overrides.project_name);
        let auth = overrides
            .auth_method
            .as_deref()
            .unwrap_or(DEFAULT_AUTH_METHOD);
        let package_path = relative_to_sibling(&input.package_dir);
        let generated_at = input.generated_at.to_rfc3339();

        let render = RenderContext::new()
            .with_variable("PROJECT_NAME", overrides.project_name.as_str())
            .with_variable("EHR_NAME", overrides.ehr_name.as_str())
            .with_variable("AUTH_METHOD", auth)
            .with_variable("IMPORT_PATH", input.import_path.as_str())
            .with_variable("PACKAGE_PATH", package_path.as_str())
            .with_variable("GENERATED_AT", generated_at.as_str());

        let manifest = ServiceManifest {
            service: ServiceSection {
                name: &overrides.project_name,
                ehr: &overrides.ehr_name,
                auth,
            },
            dependencies: ServiceDependencies {
                package: PackageReference {
                    org: &input.organization,
                    name: &input.package_name,
                    version: &input.version,
                    path: &package_path,
                },
            },
        };
        let manifest = toml::to_string(&manifest)
            .map_err(|e| serialization_failure(StageKind::Service, e))?;

        let descriptor = json!({
            "name": overrides.project_name,
            "ehrName": overrides.ehr_name,
            "authMethod": auth,
            "package": {
                "name": input.package_name,
                "importPath": input.import_path,
                "version": input.version,
                "path": package_path,
            },
            "profiles": input.included_profiles,
            "generatedAt": generated_at,
        });
        let descriptor = serde_json::to_string_pretty(&descriptor)
            .map_err(|e| serialization_failure(StageKind::Service, e))?;

        let tree = OutputTree::new()
            .with_file(project_dir.join("Service.toml"), manifest)?
            .with_file(project_dir.join("service.json"), descriptor + "\n")?
            .with_file(project_dir.join("README.md"), render.render(templates::SERVICE_README))?;

        let files = write_tree(self.fs.as_ref(), ctx.output_dir(), &tree)?;
        info!(project = %overrides.project_name, files = files.len(), "Service written");

        Ok(ServiceArtifacts { project_dir, files })
    }
}

/// Path from a project directory to a sibling package directory.
fn relative_to_sibling(package_dir: &Path) -> String {
    format!("../{}", package_dir.display())
}
