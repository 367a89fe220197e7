//! Pipeline Orchestrator - main application use case.
//!
//! Coordinates one generation run:
//! 1. Resolve profiles (and possibly the endpoint name) from the capability
//!    statement
//! 2. Build the implementation-guide overlay
//! 3. Configure and execute the template stage
//! 4. Configure and execute the service stage with stage one's properties
//!
//! Planning (steps 1-2) is separate from execution so a run can be previewed.

use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        context::{ExecutionContext, GENERATOR_PROPERTIES_KEY},
        services::{ProfileSetResolver, StageRegistry},
    },
    domain::{
        CancelToken, ConfigPatch, ConfigTree, DEFAULT_IG_NAME, DEFAULT_ORGANIZATION,
        DomainError, DomainValidator, GenerationRequest, GeneratorProperties,
        ImplementationGuideOverride, OverlayConfigBuilder, ProfileSet, ServiceArtifacts,
        ServiceOverrides, StageKind, TemplateStageSettings,
    },
    error::{EhrGenError, EhrGenResult},
};

/// Template stage base configuration inside the tool configuration.
pub const TEMPLATE_CONFIG_PATH: &str = "fhir.tools.template.config";
/// Implementation guide overlay inside the template configuration.
pub const IG_CONFIG_PATH: &str = "project.package.igConfig";
pub const DEPENDENT_PACKAGE_PATH: &str = "project.package.dependentPackage";
pub const NAME_PREFIX_PATH: &str = "project.package.namePrefix";

/// Defaults applied when the request leaves a value out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSettings {
    pub default_ig_name: String,
    pub default_organization: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_ig_name: DEFAULT_IG_NAME.to_string(),
            default_organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }
}

/// Everything decided before any stage runs.
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    pub request: GenerationRequest,
    pub profiles: ProfileSet,
    pub overlay: ImplementationGuideOverride,
    pub patches: Vec<ConfigPatch>,
    pub template_settings: TemplateStageSettings,
    pub service_overrides: ServiceOverrides,
    /// Recoverable failures met while resolving.
    pub warnings: Vec<EhrGenError>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub properties: GeneratorProperties,
    pub artifacts: ServiceArtifacts,
    pub warnings: Vec<EhrGenError>,
}

/// Main generation service.
pub struct PipelineOrchestrator {
    resolver: ProfileSetResolver,
    registry: StageRegistry,
    base_config: ConfigTree,
    settings: PipelineSettings,
}

impl PipelineOrchestrator {
    pub fn new(
        resolver: ProfileSetResolver,
        registry: StageRegistry,
        base_config: ConfigTree,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver,
            registry,
            base_config,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Plan and execute.
    pub fn run(
        &self,
        request: GenerationRequest,
        token: &CancelToken,
    ) -> EhrGenResult<PipelineOutcome> {
        let plan = self.plan(request, token)?;
        self.execute(plan, token)
    }

    /// Resolve profiles, settle the endpoint name, and build the stage
    /// configuration.
    ///
    /// Capability statement fetch and parse failures are recorded in
    /// [`PipelinePlan::warnings`] and do not abort. A run with no endpoint
    /// name fails with [`DomainError::MissingName`].
    #[instrument(skip_all, fields(output = %request.output_dir().display()))]
    pub fn plan(
        &self,
        mut request: GenerationRequest,
        token: &CancelToken,
    ) -> EhrGenResult<PipelinePlan> {
        let mut profiles = request.included_profiles().clone();
        let mut warnings = Vec::new();

        if let Some(location) = request.capability_location().cloned() {
            match self
                .resolver
                .resolve(&location, &profiles, request.endpoint_name(), token)
            {
                Ok(resolution) => {
                    profiles = resolution.profiles;
                    if let Some(name) = resolution.inferred_name {
                        info!(name = %name, "Using capability statement publisher as EHR name");
                        request.adopt_inferred_name(&name);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "Continuing without capability statement profiles");
                    warnings.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        let ehr_name = request
            .endpoint_name()
            .ok_or(DomainError::MissingName)?
            .to_string();
        let project_name = request.project_name()?.to_string();
        DomainValidator::validate_directory_name("project name", &project_name)?;

        let organization = request
            .organization()
            .unwrap_or(self.settings.default_organization.as_str());
        let overlay = OverlayConfigBuilder::build(
            &self.settings.default_ig_name,
            Some(organization),
            profiles.clone(),
            ProfileSet::new(),
        )?;

        let mut patches = vec![ConfigPatch::new(IG_CONFIG_PATH, overlay.to_json())];
        if let Some(package) = request.dependent_package() {
            patches.push(ConfigPatch::new(DEPENDENT_PACKAGE_PATH, package));
            patches.push(ConfigPatch::new(NAME_PREFIX_PATH, name_prefix(package)));
        }

        let mut config = self.base_config.slice(TEMPLATE_CONFIG_PATH)?;
        config.apply(&patches)?;

        let service_overrides = ServiceOverrides {
            project_name,
            ehr_name,
            auth_method: request.auth_method().map(String::from),
        };

        info!(
            profiles = profiles.len(),
            project = %service_overrides.project_name,
            warnings = warnings.len(),
            "Generation planned"
        );

        Ok(PipelinePlan {
            request,
            profiles,
            overlay,
            patches,
            template_settings: TemplateStageSettings { config },
            service_overrides,
            warnings,
        })
    }

    /// Run both stages. Output written by stage one is kept if stage two
    /// fails.
    #[instrument(skip_all, fields(project = %plan.service_overrides.project_name))]
    pub fn execute(&self, plan: PipelinePlan, token: &CancelToken) -> EhrGenResult<PipelineOutcome> {
        let PipelinePlan {
            request,
            template_settings,
            service_overrides,
            warnings,
            ..
        } = plan;

        let mut ctx = ExecutionContext::new(request.output_dir());
        info!(run_id = %ctx.run_id(), "Starting generation");

        // Stage one
        check_cancelled(token, StageKind::Template)?;
        let mut template = self.registry.template_stage()?;
        template
            .configure(template_settings)
            .map_err(|e| stage_failure(StageKind::Template, e))?;
        let properties = template
            .execute(&mut ctx, &())
            .map_err(|e| stage_failure(StageKind::Template, e))?;
        ctx.set_as(GENERATOR_PROPERTIES_KEY, &properties)
            .map_err(|e| ApplicationError::StageExecution {
                stage: StageKind::Template,
                reason: format!("generator properties are not serializable: {e}"),
            })?;
        info!(package = %properties.package_name, "Template stage completed");

        // Stage two
        check_cancelled(token, StageKind::Service)?;
        let mut service = self.registry.service_stage()?;
        service
            .configure(service_overrides)
            .map_err(|e| stage_failure(StageKind::Service, e))?;
        let artifacts = service
            .execute(&mut ctx, &properties)
            .map_err(|e| stage_failure(StageKind::Service, e))?;
        info!(
            project_dir = %artifacts.project_dir.display(),
            files = artifacts.files.len(),
            "Service stage completed"
        );

        Ok(PipelineOutcome {
            run_id: ctx.run_id(),
            properties,
            artifacts,
            warnings,
        })
    }
}

/// Substring after the last `/`, or the whole reference.
fn name_prefix(package: &str) -> &str {
    package
        .rsplit_once('/')
        .map_or(package, |(_, tail)| tail)
}

fn check_cancelled(token: &CancelToken, stage: StageKind) -> EhrGenResult<()> {
    if token.is_cancelled() {
        return Err(ApplicationError::Cancelled {
            reason: format!("cancelled before the '{stage}' stage"),
        }
        .into());
    }
    Ok(())
}

/// Application errors pass through; anything else becomes a stage failure.
fn stage_failure(stage: StageKind, err: EhrGenError) -> EhrGenError {
    match err {
        EhrGenError::Application(_) => err,
        other => ApplicationError::StageExecution {
            stage,
            reason: other.to_string(),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::Stage;
    use crate::application::ports::output::{MockDocumentSource, MockSpecParser};
    use crate::domain::{
        CapabilityDeclaration, CapabilityLocation, ResourceEntry, RestSection,
    };
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // ------------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------------

    #[derive(Default)]
    struct Calls {
        template_config: Option<ConfigTree>,
        service_overrides: Option<ServiceOverrides>,
        service_input: Option<GeneratorProperties>,
        context_props: Option<serde_json::Value>,
    }

    struct FakeTemplate {
        calls: Arc<Mutex<Calls>>,
    }

    impl Stage for FakeTemplate {
        type Settings = TemplateStageSettings;
        type Input = ();
        type Output = GeneratorProperties;

        fn kind(&self) -> StageKind {
            StageKind::Template
        }

        fn configure(&mut self, settings: TemplateStageSettings) -> EhrGenResult<()> {
            self.calls.lock().unwrap().template_config = Some(settings.config);
            Ok(())
        }

        fn execute(
            &mut self,
            _ctx: &mut ExecutionContext,
            _input: &(),
        ) -> EhrGenResult<GeneratorProperties> {
            let calls = self.calls.lock().unwrap();
            let config = calls.template_config.as_ref().unwrap();
            let profiles: ProfileSet = config
                .extract("project.package.igConfig.includedProfiles")
                .unwrap();
            Ok(GeneratorProperties {
                package_name: "ehr_pkg".into(),
                organization: "healthcare".into(),
                version: "0.1.0".into(),
                implementation_guide: "ehr".into(),
                import_path: "healthcare/ehr".into(),
                included_profiles: profiles,
                dependent_package: None,
                package_dir: PathBuf::from("ehr_pkg"),
                generated_at: DateTime::<Utc>::UNIX_EPOCH,
            })
        }
    }

    struct FakeService {
        calls: Arc<Mutex<Calls>>,
        fail: bool,
    }

    impl Stage for FakeService {
        type Settings = ServiceOverrides;
        type Input = GeneratorProperties;
        type Output = ServiceArtifacts;

        fn kind(&self) -> StageKind {
            StageKind::Service
        }

        fn configure(&mut self, settings: ServiceOverrides) -> EhrGenResult<()> {
            self.calls.lock().unwrap().service_overrides = Some(settings);
            Ok(())
        }

        fn execute(
            &mut self,
            ctx: &mut ExecutionContext,
            input: &GeneratorProperties,
        ) -> EhrGenResult<ServiceArtifacts> {
            if self.fail {
                return Err(DomainError::DuplicatePath {
                    path: "Service.toml".into(),
                }
                .into());
            }
            let mut calls = self.calls.lock().unwrap();
            calls.service_input = Some(input.clone());
            calls.context_props = ctx.get(GENERATOR_PROPERTIES_KEY).cloned();
            Ok(ServiceArtifacts {
                project_dir: PathBuf::from("svc"),
                files: vec![PathBuf::from("svc/Service.toml")],
            })
        }
    }

    fn base_config() -> ConfigTree {
        ConfigTree::new(json!({
            "fhir": { "tools": { "template": { "config": {
                "project": { "package": { "version": "0.1.0" } }
            } } } }
        }))
    }

    fn registry(calls: &Arc<Mutex<Calls>>, fail_service: bool) -> StageRegistry {
        let mut registry = StageRegistry::new();
        let t = Arc::clone(calls);
        registry.register_template(move || {
            Box::new(FakeTemplate {
                calls: Arc::clone(&t),
            })
        });
        let s = Arc::clone(calls);
        registry.register_service(move || {
            Box::new(FakeService {
                calls: Arc::clone(&s),
                fail: fail_service,
            })
        });
        registry
    }

    fn resolver_with(
        load: impl Fn() -> EhrGenResult<String> + Send + 'static,
        decl: Option<CapabilityDeclaration>,
    ) -> ProfileSetResolver {
        let mut source = MockDocumentSource::new();
        source.expect_load().returning(move |_, _| load());
        let mut parser = MockSpecParser::new();
        match decl {
            Some(decl) => {
                parser
                    .expect_parse()
                    .returning(move |_, _| Ok(decl.clone()));
            }
            None => {
                parser.expect_parse().never();
            }
        }
        ProfileSetResolver::new(Box::new(source), Box::new(parser))
    }

    fn acme() -> CapabilityDeclaration {
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

    fn orchestrator(
        resolver: ProfileSetResolver,
        calls: &Arc<Mutex<Calls>>,
        fail_service: bool,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::new(
            resolver,
            registry(calls, fail_service),
            base_config(),
            PipelineSettings::default(),
        )
    }

    // ------------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------------

    #[test]
    fn end_to_end_with_local_capability_statement() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(|| Ok("{}".into()), Some(acme()));
        let pipeline = orchestrator(resolver, &calls, false);

        let request = GenerationRequest::builder("/out")
            .capability_location(CapabilityLocation::Local(PathBuf::from("cs.json")))
            .build()
            .unwrap();

        let outcome = pipeline.run(request, &CancelToken::new()).unwrap();
        assert!(outcome.warnings.is_empty());

        let calls = calls.lock().unwrap();
        let config = calls.template_config.as_ref().unwrap();
        assert_eq!(
            config.get("project.package.igConfig.includedProfiles"),
            Some(&json!(["P1", "P2", "P3"]))
        );
        assert_eq!(
            config.get("project.package.igConfig.importStatement"),
            Some(&json!("healthcare/ehr"))
        );
        assert_eq!(
            config.get("project.package.version"),
            Some(&json!("0.1.0"))
        );

        let overrides = calls.service_overrides.as_ref().unwrap();
        assert_eq!(overrides.ehr_name, "Acme");
        assert_eq!(overrides.project_name, "Acme-service");

        assert_eq!(calls.service_input.as_ref(), Some(&outcome.properties));
        assert_eq!(
            calls.context_props.as_ref().map(|v| v["packageName"].clone()),
            Some(json!("ehr_pkg"))
        );
    }

    #[test]
    fn fetch_failure_is_reported_and_run_continues() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(
            || {
                Err(ApplicationError::Fetch {
                    location: "https://ehr.example/metadata".into(),
                    reason: "connection refused".into(),
                }
                .into())
            },
            None,
        );
        let pipeline = orchestrator(resolver, &calls, false);

        let request = GenerationRequest::builder("/out")
            .endpoint_name("epic")
            .included_profiles(["X"])
            .capability_location(
                CapabilityLocation::parse("https://ehr.example/metadata").unwrap(),
            )
            .build()
            .unwrap();

        let outcome = pipeline.run(request, &CancelToken::new()).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].is_recoverable());
        assert_eq!(outcome.properties.included_profiles.to_vec(), vec!["X"]);

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.service_overrides.as_ref().unwrap().project_name,
            "epic-service"
        );
    }

    #[test]
    fn missing_name_stops_before_any_stage() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(|| Ok(String::new()), None);
        let pipeline = orchestrator(resolver, &calls, false);

        let request = GenerationRequest::builder("/out").build().unwrap();
        let err = pipeline.run(request, &CancelToken::new()).unwrap_err();

        assert!(err.is_missing_name());
        assert!(calls.lock().unwrap().template_config.is_none());
    }

    #[test]
    fn dependent_package_adds_reference_and_prefix() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(|| Ok(String::new()), None);
        let pipeline = orchestrator(resolver, &calls, false);

        let request = GenerationRequest::builder("/out")
            .endpoint_name("epic")
            .organization("orgx")
            .dependent_package("acme/us_core")
            .build()
            .unwrap();
        let plan = pipeline.plan(request, &CancelToken::new()).unwrap();
        let config = &plan.template_settings.config;

        assert_eq!(
            config.get("project.package.dependentPackage"),
            Some(&json!("acme/us_core"))
        );
        assert_eq!(
            config.get("project.package.namePrefix"),
            Some(&json!("us_core"))
        );
        assert_eq!(plan.overlay.import_path(), "orgx/ehr");
        assert_eq!(plan.patches.len(), 3);
    }

    #[test]
    fn stage_domain_errors_become_stage_execution() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(|| Ok(String::new()), None);
        let pipeline = orchestrator(resolver, &calls, true);

        let request = GenerationRequest::builder("/out")
            .endpoint_name("epic")
            .build()
            .unwrap();
        let err = pipeline.run(request, &CancelToken::new()).unwrap_err();

        assert!(matches!(
            err,
            EhrGenError::Application(ApplicationError::StageExecution {
                stage: StageKind::Service,
                ..
            })
        ));
    }

    #[test]
    fn missing_template_slice_is_a_config_error() {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let resolver = resolver_with(|| Ok(String::new()), None);
        let pipeline = PipelineOrchestrator::new(
            resolver,
            registry(&calls, false),
            ConfigTree::default(),
            PipelineSettings::default(),
        );

        let request = GenerationRequest::builder("/out")
            .endpoint_name("epic")
            .build()
            .unwrap();
        let err = pipeline.plan(request, &CancelToken::new()).unwrap_err();

        assert!(matches!(
            err,
            EhrGenError::Domain(DomainError::InvalidConfigPath { .. })
        ));
    }

    #[test]
    fn name_prefix_takes_last_segment() {
        assert_eq!(name_prefix("acme/us_core"), "us_core");
        assert_eq!(name_prefix("a/b/c"), "c");
        assert_eq!(name_prefix("plain"), "plain");
    }
}
