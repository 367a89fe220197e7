//! `ehrgen config`: inspect the effective configuration.

use ehrgen_adapters::load_tool_config;
use ehrgen_core::domain::ConfigTree;
use serde_json::Value;

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::Show => {
            if output.format() == OutputFormat::Json {
                output.json(&config)?;
                return Ok(());
            }
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }

        ConfigCommands::Tool => {
            let tree = load_tool_config(config.tool.config_path.as_deref())?;
            let text = serde_json::to_string_pretty(tree.as_value())
                .with_cli_context(|| "Failed to render tool configuration")?;
            output.print(&text)?;
        }
    }

    Ok(())
}

/// Look up a dotted key. Strings print bare; everything else prints as JSON.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let tree = serde_json::to_value(config)
        .map(ConfigTree::new)
        .with_cli_context(|| "Failed to serialise config")?;

    match tree.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(CliError::config(format!("Unknown config key: '{key}'"))),
        Some(other) => Ok(other.to_string()),
    }
}
