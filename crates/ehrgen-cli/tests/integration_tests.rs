//! Integration tests for the `ehrgen` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ACME_STATEMENT: &str = r#"{
  "resourceType": "CapabilityStatement",
  "publisher": "Acme",
  "rest": [{
    "resource": [
      { "type": "Patient", "supportedProfile": ["P1", "P2"] },
      { "type": "Encounter", "supportedProfile": ["P2", "P3"] }
    ]
  }]
}"#;

/// Command running inside `dir`, isolated from user config and `.env` files.
fn ehrgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ehrgen").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("EHRGEN__FETCH__TIMEOUT_SECS");
    cmd
}

fn write_statement(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("capability.json");
    std::fs::write(&path, ACME_STATEMENT).unwrap();
    path
}

#[test]
fn help_lists_generate_options() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--capability-statement"))
        .stdout(predicate::str::contains("--ehr-name"))
        .stdout(predicate::str::contains("--included-profile"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn generates_package_and_service_from_local_statement() {
    let temp = TempDir::new().unwrap();
    let statement = write_statement(temp.path());

    ehrgen(temp.path())
        .args(["generate", "--capability-statement"])
        .arg(&statement)
        .args(["-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme-service"));

    let out = temp.path().join("out");
    assert!(out.join("health_fhir_r4_ehr/Package.toml").exists());
    assert!(out.join("Acme-service/Service.toml").exists());

    let ig: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.join("health_fhir_r4_ehr/ig-config.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(ig["includedProfiles"], serde_json::json!(["P1", "P2", "P3"]));
}

#[test]
fn flags_shape_the_generated_service() {
    let temp = TempDir::new().unwrap();

    ehrgen(temp.path())
        .args([
            "gen",
            "--ehr-name",
            "epic",
            "--project-name",
            "epic-bridge",
            "--org-name",
            "acme",
            "--included-profile",
            "P1,P2",
            "--auth-method",
            "smart",
            "-o",
            "out",
        ])
        .assert()
        .success();

    let manifest =
        std::fs::read_to_string(temp.path().join("out/epic-bridge/Service.toml")).unwrap();
    assert!(manifest.contains(r#"auth = "smart""#));

    let ig = std::fs::read_to_string(temp.path().join("out/health_fhir_r4_ehr/ig-config.json"))
        .unwrap();
    assert!(ig.contains("acme/ehr"));
}

#[test]
fn unreachable_statement_is_a_warning() {
    let temp = TempDir::new().unwrap();

    ehrgen(temp.path())
        .args([
            "generate",
            "--capability-statement",
            "http://127.0.0.1:1/fhir/metadata",
            "--ehr-name",
            "epic",
            "--timeout",
            "5",
            "-o",
            "out",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to fetch"));

    assert!(temp.path().join("out/epic-service/Service.toml").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let statement = write_statement(temp.path());

    ehrgen(temp.path())
        .args(["generate", "--dry-run", "--capability-statement"])
        .arg(&statement)
        .args(["-o", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme-service"))
        .stdout(predicate::str::contains("P3"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn request_file_with_flag_override() {
    let temp = TempDir::new().unwrap();
    let request = temp.path().join("request.json");
    std::fs::write(
        &request,
        r#"{ "endpointName": "epic", "includedProfiles": ["P1"], "outputLocation": "from-file" }"#,
    )
    .unwrap();

    ehrgen(temp.path())
        .args(["generate", "--request"])
        .arg(&request)
        .args(["--ehr-name", "cerner"])
        .assert()
        .success();

    assert!(temp.path().join("from-file/cerner-service/Service.toml").exists());
}

#[test]
fn json_output_reports_files() {
    let temp = TempDir::new().unwrap();

    let assert = ehrgen(temp.path())
        .args([
            "--output-format",
            "json",
            "generate",
            "--ehr-name",
            "epic",
            "-o",
            "out",
        ])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["projectDir"], "epic-service");
    assert_eq!(report["files"].as_array().unwrap().len(), 3);
}

#[test]
fn config_get_honours_environment() {
    let temp = TempDir::new().unwrap();

    ehrgen(temp.path())
        .args(["config", "get", "fetch.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("30\n"));

    ehrgen(temp.path())
        .env("EHRGEN__FETCH__TIMEOUT_SECS", "5")
        .args(["config", "get", "fetch.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn config_file_sets_default_organization() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("ehrgen.toml");
    std::fs::write(&config, "[generation]\ndefault_organization = \"acme\"\n").unwrap();

    ehrgen(temp.path())
        .args(["--config"])
        .arg(&config)
        .args(["config", "get", "generation.default_organization"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"));
}

#[test]
fn config_tool_prints_template_config() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["config", "tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("namePrefix"));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ehrgen"));
}
