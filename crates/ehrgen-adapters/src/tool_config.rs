//! Base tool configuration.
//!
//! The configuration that ships with ehrgen is embedded at build time. A
//! JSON file with the same layout can replace it (`tool.config_path` in the
//! application config).

use std::path::Path;

use ehrgen_core::{
    application::ApplicationError,
    domain::ConfigTree,
    error::EhrGenResult,
};
use tracing::{debug, instrument};

const EMBEDDED: &str = include_str!("../resources/tool-config.json");

/// The embedded base configuration.
pub fn base_config() -> EhrGenResult<ConfigTree> {
    Ok(ConfigTree::from_json_str(EMBEDDED)?)
}

/// The configuration at `path`, or the embedded one when `path` is `None`.
#[instrument]
pub fn load_tool_config(path: Option<&Path>) -> EhrGenResult<ConfigTree> {
    let Some(path) = path else {
        debug!("Using embedded tool configuration");
        return base_config();
    };

    debug!(path = %path.display(), "Loading tool configuration");
    let text = std::fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to read tool configuration: {e}"),
    })?;
    Ok(ConfigTree::from_json_str(&text)?)
}
