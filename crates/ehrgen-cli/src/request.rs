//! Generation request assembly.
//!
//! A request comes from an optional JSON file (`--request`) overlaid with
//! command-line flags. Unknown keys in the file are rejected.

use std::path::{Path, PathBuf};

use ehrgen_core::domain::{CapabilityLocation, GenerationRequest};
use serde::Deserialize;
use tracing::debug;

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
};

/// The JSON shape accepted by `--request`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerationRequestFile {
    pub endpoint_name: Option<String>,
    pub project_name: Option<String>,
    pub organization: Option<String>,
    #[serde(default)]
    pub included_profiles: Vec<String>,
    pub dependent_package: Option<String>,
    pub capability_location: Option<String>,
    pub auth_method: Option<String>,
    pub output_location: Option<PathBuf>,
}

impl GenerationRequestFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::RequestFileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(CliError::IoError {
                    message: format!("Failed to read request file {}", path.display()),
                    source: e,
                });
            }
        };

        Self::parse(&text).map_err(|reason| CliError::InvalidRequestFile {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

/// Overlay `args` on `file` and build a validated request.
///
/// Scalar flags replace file values. `--included-profile`, when given at
/// all, replaces the file's list. The output directory falls back to
/// `generation.output_dir` from config.
pub fn build_request(
    args: &GenerateArgs,
    file: GenerationRequestFile,
    config: &AppConfig,
) -> CliResult<GenerationRequest> {
    let output_dir = args
        .output
        .clone()
        .or(file.output_location)
        .unwrap_or_else(|| config.generation.output_dir.clone());

    let profiles = if args.included_profiles.is_empty() {
        file.included_profiles
    } else {
        args.included_profiles.clone()
    };

    let mut builder = GenerationRequest::builder(output_dir).included_profiles(profiles);

    if let Some(name) = pick(&args.ehr_name, file.endpoint_name) {
        builder = builder.endpoint_name(name);
    }
    if let Some(name) = pick(&args.project_name, file.project_name) {
        builder = builder.project_name(name);
    }
    if let Some(org) = pick(&args.org_name, file.organization) {
        builder = builder.organization(org);
    }
    if let Some(package) = pick(&args.dependent_package, file.dependent_package) {
        builder = builder.dependent_package(package);
    }
    if let Some(method) = pick(&args.auth_method, file.auth_method) {
        builder = builder.auth_method(method);
    }
    if let Some(raw) = pick(&args.capability_statement, file.capability_location) {
        let location = CapabilityLocation::parse(&raw).map_err(|e| CliError::InvalidInput {
            message: format!("capability statement location '{raw}'"),
            source: Some(Box::new(e)),
        })?;
        debug!(%location, remote = location.is_remote(), "Capability statement location");
        builder = builder.capability_location(location);
    }

    builder.build().map_err(|e| CliError::Core(e.into()))
}

fn pick(flag: &Option<String>, file: Option<String>) -> Option<String> {
    flag.clone().or(file)
}
