//! Stage one: FHIR package generation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use ehrgen_core::{
    application::{ExecutionContext, ports::{Filesystem, Stage}},
    domain::{
        DomainValidator, GeneratorProperties, ImplementationGuideOverride, OutputTree,
        RenderContext, StageKind, TemplateStageSettings, to_snake_case,
    },
    error::EhrGenResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{not_configured, serialization_failure, templates};
use crate::filesystem::write_tree;

/// Path of the package settings inside the template configuration.
const PACKAGE_PATH: &str = "project.package";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageSettings {
    org: String,
    name_prefix: String,
    version: String,
    #[serde(default)]
    keywords: Vec<String>,
    ig_config: ImplementationGuideOverride,
    #[serde(default)]
    dependent_package: Option<String>,
}

/// `Package.toml` layout.
#[derive(Serialize)]
struct PackageManifest<'a> {
    package: PackageSection<'a>,
    implementation_guide: GuideSection<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependency: Option<DependencySection<'a>>,
}

#[derive(Serialize)]
struct PackageSection<'a> {
    org: &'a str,
    name: &'a str,
    version: &'a str,
    keywords: &'a [String],
}

#[derive(Serialize)]
struct GuideSection<'a> {
    name: &'a str,
    import: &'a str,
    profiles: usize,
}

#[derive(Serialize)]
struct DependencySection<'a> {
    package: &'a str,
}

/// Writes `<out>/<package>/` with `Package.toml`, `ig-config.json` and a
/// README.
pub struct PackageTemplateStage {
    fs: Arc<dyn Filesystem>,
    settings: Option<PackageSettings>,
}

impl PackageTemplateStage {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs, settings: None }
    }
}

impl Stage for PackageTemplateStage {
    type Settings = TemplateStageSettings;
    type Input = ();
    type Output = GeneratorProperties;

    fn kind(&self) -> StageKind {
        StageKind::Template
    }

    fn configure(&mut self, settings: TemplateStageSettings) -> EhrGenResult<()> {
        let package: PackageSettings = settings.config.extract(PACKAGE_PATH)?;
        debug!(
            ig = package.ig_config.name(),
            profiles = package.ig_config.included_profiles().len(),
            "Template stage configured"
        );
        self.settings = Some(package);
        Ok(())
    }

    #[instrument(skip_all, fields(run_id = %ctx.run_id()))]
    fn execute(&mut self, ctx: &mut ExecutionContext, _input: &()) -> EhrGenResult<GeneratorProperties> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| not_configured(StageKind::Template))?;
        let ig = &settings.ig_config;

        let organization = ig
            .import_path()
            .split_once('/')
            .map_or(settings.org.as_str(), |(org, _)| org)
            .to_string();
        let package_name = to_snake_case(&format!("{} {}", settings.name_prefix, ig.name()));
        DomainValidator::validate_directory_name("package name", &package_name)?;
        let package_dir = PathBuf::from(&package_name);

        let profiles: Vec<&str> = ig.included_profiles().iter().collect();
        let profile_list = if profiles.is_empty() {
            "_No profiles selected._".to_string()
        } else {
            profiles
                .iter()
                .map(|p| format!("- `{p}`"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let manifest = PackageManifest {
            package: PackageSection {
                org: &organization,
                name: &package_name,
                version: &settings.version,
                keywords: &settings.keywords,
            },
            implementation_guide: GuideSection {
                name: ig.name(),
                import: ig.import_path(),
                profiles: profiles.len(),
            },
            dependency: settings
                .dependent_package
                .as_deref()
                .map(|package| DependencySection { package }),
        };
        let manifest = toml::to_string(&manifest)
            .map_err(|e| serialization_failure(StageKind::Template, e))?;

        let render = RenderContext::new()
            .with_variable("PACKAGE_NAME", package_name.as_str())
            .with_variable("IG_NAME", ig.name())
            .with_variable("IMPORT_PATH", ig.import_path())
            .with_variable("PROFILE_LIST", profile_list)
            .with_variable("GENERATOR_VERSION", ehrgen_core::VERSION);

        let ig_json = serde_json::to_string_pretty(ig)
            .map_err(|e| serialization_failure(StageKind::Template, e))?;

        let tree = OutputTree::new()
            .with_file(package_dir.join("Package.toml"), manifest)?
            .with_file(package_dir.join("ig-config.json"), ig_json + "\n")?
            .with_file(package_dir.join("README.md"), render.render(templates::PACKAGE_README))?;

        let written = write_tree(self.fs.as_ref(), ctx.output_dir(), &tree)?;
        info!(package = %package_name, files = written.len(), "Package written");

        Ok(GeneratorProperties {
            package_name,
            organization,
            version: settings.version.clone(),
            implementation_guide: ig.name().to_string(),
            import_path: ig.import_path().to_string(),
            included_profiles: ig.included_profiles().clone(),
            dependent_package: settings.dependent_package.clone(),
            package_dir,
            generated_at: Utc::now(),
        })
    }
}
