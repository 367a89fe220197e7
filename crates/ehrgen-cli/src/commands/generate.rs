//! `ehrgen generate`: resolve the request, then run both stages.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ehrgen_adapters::{
    CapabilityDocumentLoader, FhirJsonParser, LocalFilesystem, load_tool_config,
    register_builtin_stages, stages::DEFAULT_AUTH_METHOD,
};
use ehrgen_core::prelude::*;
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    request::{GenerationRequestFile, build_request},
};

#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let file = match &args.request {
        Some(path) => GenerationRequestFile::load(path)?,
        None => GenerationRequestFile::default(),
    };
    let request = build_request(&args, file, &config)?;
    let output_dir = request.output_dir().to_path_buf();

    let pipeline = build_pipeline(&args, &config)?;
    let token = CancelToken::new();

    let plan = pipeline.plan(request, &token)?;
    for warning in &plan.warnings {
        output.warning(&warning.to_string())?;
    }

    if args.dry_run {
        return print_plan(&output, &plan);
    }

    let outcome = pipeline.execute(plan, &token)?;
    info!(run_id = %outcome.run_id, "Generation finished");
    print_outcome(&output, &output_dir, &outcome)
}

fn build_pipeline(args: &GenerateArgs, config: &AppConfig) -> CliResult<PipelineOrchestrator> {
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.fetch_timeout());
    if timeout.is_zero() {
        return Err(CliError::invalid_input(
            "fetch timeout must be at least one second",
        ));
    }

    let loader = CapabilityDocumentLoader::new(timeout)?;
    let resolver = ProfileSetResolver::new(Box::new(loader), Box::new(FhirJsonParser::new()));

    let mut registry = StageRegistry::new();
    register_builtin_stages(&mut registry, Arc::new(LocalFilesystem::new()));

    let base_config = load_tool_config(config.tool.config_path.as_deref()).map_err(|e| {
        CliError::ConfigError {
            message: "Failed to load tool configuration".into(),
            source: Some(Box::new(e)),
        }
    })?;

    Ok(PipelineOrchestrator::new(
        resolver,
        registry,
        base_config,
        config.pipeline_settings(),
    ))
}

fn warning_messages(warnings: &[EhrGenError]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

fn print_plan(output: &OutputManager, plan: &PipelinePlan) -> CliResult<()> {
    let overrides = &plan.service_overrides;
    let auth = overrides.auth_method.as_deref().unwrap_or(DEFAULT_AUTH_METHOD);

    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "dryRun": true,
            "outputDir": plan.request.output_dir(),
            "ehrName": overrides.ehr_name,
            "projectName": overrides.project_name,
            "authMethod": auth,
            "igConfig": plan.overlay,
            "warnings": warning_messages(&plan.warnings),
        }))?;
        return Ok(());
    }

    output.header("Generation plan (dry run)")?;
    output.field("Output", &plan.request.output_dir().display().to_string())?;
    output.field("EHR name", &overrides.ehr_name)?;
    output.field("Project", &overrides.project_name)?;
    output.field("Auth method", auth)?;
    output.field("Implementation guide", plan.overlay.name())?;
    output.field("Import path", plan.overlay.import_path())?;
    output.field("Profiles", &plan.profiles.len().to_string())?;
    output.list(plan.profiles.iter())?;
    output.info("No files were written")?;
    Ok(())
}

fn print_outcome(output: &OutputManager, output_dir: &Path, outcome: &PipelineOutcome) -> CliResult<()> {
    let properties = &outcome.properties;
    let artifacts = &outcome.artifacts;

    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "runId": outcome.run_id.to_string(),
            "outputDir": output_dir,
            "package": properties,
            "projectDir": artifacts.project_dir,
            "files": artifacts.files,
            "warnings": warning_messages(&outcome.warnings),
        }))?;
        return Ok(());
    }

    output.success(&format!(
        "Generated {} in {}",
        artifacts.project_dir.display(),
        output_dir.display()
    ))?;
    output.field("Package", &properties.package_dir.display().to_string())?;
    output.field("Import path", &properties.import_path)?;
    output.field("Profiles", &properties.included_profiles.len().to_string())?;
    output.field("Service files", &artifacts.files.len().to_string())?;
    output.list(artifacts.files.iter().map(|f| f.display().to_string()))?;
    Ok(())
}
