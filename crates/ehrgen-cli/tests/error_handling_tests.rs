//! Tests for error handling, suggestions and exit codes.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ehrgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ehrgen").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_ehr_name_is_a_user_error() {
    let temp = TempDir::new().unwrap();
    let statement = temp.path().join("capability.json");
    std::fs::write(
        &statement,
        r#"{ "resourceType": "CapabilityStatement", "rest": [] }"#,
    )
    .unwrap();

    ehrgen(temp.path())
        .args(["generate", "-o", "out", "--capability-statement"])
        .arg(&statement)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Cannot set ehr name from capability statement",
        ))
        .stderr(predicate::str::contains("--ehr-name"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn missing_statement_without_name_reports_both() {
    let temp = TempDir::new().unwrap();

    ehrgen(temp.path())
        .args(["generate", "--capability-statement", "absent.json", "-o", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("absent.json"))
        .stderr(predicate::str::contains("--ehr-name"));
}

#[test]
fn unknown_flag_exits_two() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["generate", "--ehr", "epic"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--ehr"));
}

#[test]
fn unknown_request_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    let request = temp.path().join("request.json");
    std::fs::write(&request, r#"{ "ehrName": "epic" }"#).unwrap();

    ehrgen(temp.path())
        .args(["generate", "--request"])
        .arg(&request)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown field"))
        .stderr(predicate::str::contains("endpointName"));
}

#[test]
fn missing_request_file_exits_three() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["generate", "--request", "nope.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Request file not found"));
}

#[test]
fn blank_ehr_name_is_invalid() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["generate", "--ehr-name", "  ", "-o", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ehr name"));
}

#[test]
fn unknown_config_key_exits_four() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["config", "get", "fetch.retries"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn explicit_missing_config_file_exits_four() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["--config", "missing.toml", "config", "show"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn zero_timeout_is_rejected() {
    let temp = TempDir::new().unwrap();
    ehrgen(temp.path())
        .args(["generate", "--ehr-name", "epic", "--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}
