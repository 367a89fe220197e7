//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ehrgen",
    bin_name = "ehrgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate EHR-facing FHIR services from capability statements",
    long_about = "ehrgen reads an EHR's FHIR CapabilityStatement, resolves the \
                  profiles it supports, and generates a FHIR package plus a \
                  prebuilt service wired against it.",
    after_help = "EXAMPLES:\n\
        \x20 ehrgen generate --capability-statement ./capability.json\n\
        \x20 ehrgen generate --capability-statement https://ehr.example/fhir/metadata --ehr-name epic\n\
        \x20 ehrgen generate --request request.json --dry-run\n\
        \x20 ehrgen completions bash > /usr/share/bash-completion/completions/ehrgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the FHIR package and EHR service.
    #[command(
        visible_alias = "gen",
        about = "Generate a FHIR package and prebuilt EHR service",
        after_help = "EXAMPLES:\n\
            \x20 ehrgen generate --capability-statement ./capability.json -o ./out\n\
            \x20 ehrgen generate --ehr-name epic --included-profile http://hl7.org/fhir/us/core/StructureDefinition/us-core-patient\n\
            \x20 ehrgen generate --request request.json --org-name acme --dry-run"
    )]
    Generate(GenerateArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 ehrgen completions bash > ~/.local/share/bash-completion/completions/ehrgen\n\
            \x20 ehrgen completions zsh  > ~/.zfunc/_ehrgen\n\
            \x20 ehrgen completions fish > ~/.config/fish/completions/ehrgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the ehrgen configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 ehrgen config get fetch.timeout_secs\n\
            \x20 ehrgen config show\n\
            \x20 ehrgen config tool"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `ehrgen generate`.
///
/// Every request field can also come from `--request`; flags win.
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    /// EHR (endpoint) name. Inferred from the capability statement publisher
    /// when omitted.
    #[arg(long = "ehr-name", value_name = "NAME", help = "EHR name")]
    pub ehr_name: Option<String>,

    /// Service project name (default: `<ehr-name>-service`).
    #[arg(long = "project-name", value_name = "NAME", help = "Service project name")]
    pub project_name: Option<String>,

    /// Organization used in the package import path.
    #[arg(long = "org-name", value_name = "ORG", help = "Organization name")]
    pub org_name: Option<String>,

    /// Profile to include. Repeatable; also accepts a comma separated list.
    #[arg(
        long = "included-profile",
        value_name = "PROFILE",
        value_delimiter = ',',
        help = "Profile to include (repeatable)"
    )]
    pub included_profiles: Vec<String>,

    /// Package the generated package depends on, e.g. `acme/us_core`.
    #[arg(
        long = "dependent-package",
        value_name = "PACKAGE",
        help = "Dependent package reference"
    )]
    pub dependent_package: Option<String>,

    /// Capability statement file path or http(s) URL.
    #[arg(
        long = "capability-statement",
        value_name = "PATH|URL",
        help = "Capability statement path or URL"
    )]
    pub capability_statement: Option<String>,

    /// Authentication method recorded in the generated service.
    #[arg(long = "auth-method", value_name = "METHOD", help = "Authentication method")]
    pub auth_method: Option<String>,

    /// Output directory.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: from config, else current directory)"
    )]
    pub output: Option<PathBuf>,

    /// JSON file holding the request.
    #[arg(long = "request", value_name = "FILE", help = "Read the request from a JSON file")]
    pub request: Option<PathBuf>,

    /// Remote fetch timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", help = "Capability statement fetch timeout")]
    pub timeout: Option<u64>,

    /// Resolve and print the plan without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `ehrgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `ehrgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `fetch.timeout_secs`.
        key: String,
    },
    /// Print all configuration values.
    Show,
    /// Print the path to the default configuration file.
    Path,
    /// Print the base tool configuration the stages are configured from.
    Tool,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "ehrgen",
            "generate",
            "--capability-statement",
            "cs.json",
            "--ehr-name",
            "epic",
            "-o",
            "out",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.capability_statement.as_deref(), Some("cs.json"));
        assert_eq!(args.ehr_name.as_deref(), Some("epic"));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(!args.dry_run);
    }

    #[test]
    fn included_profiles_repeat_and_split() {
        let cli = Cli::parse_from([
            "ehrgen",
            "gen",
            "--included-profile",
            "P1,P2",
            "--included-profile",
            "P3",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.included_profiles, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let result = Cli::try_parse_from(["ehrgen", "generate", "--ehr", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["ehrgen", "--quiet", "--verbose", "config", "show"]);
        assert!(result.is_err());
    }
}
