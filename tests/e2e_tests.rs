//! End-to-end tests for the depaudit CLI
//!
//! These tests verify:
//! - Argument validation and conflicting flags
//! - Fatal errors for unreadable inputs
//! - Text and JSON output for projects that need no registry data
//! - Registry failures are reported per package, in report and update runs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Nothing listens on the discard port, so lookups fail fast
const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:9";

fn depaudit() -> Command {
    let mut cmd = Command::cargo_bin("depaudit").expect("binary should be built");
    cmd.env_remove("DEPAUDIT_INSTALLER")
        .env_remove("DEPAUDIT_REGISTRY")
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--registry")
        .arg(UNREACHABLE_REGISTRY);
    cmd
}

fn project(package_json: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("package.json"), package_json).unwrap();
    temp_dir
}

#[test]
fn test_help() {
    Command::cargo_bin("depaudit")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Check for outdated, incorrect, and unused dependencies",
        ))
        .stdout(predicate::str::contains("--update-all"));
}

#[test]
fn test_update_modes_conflict() {
    let temp_dir = project("{}");
    depaudit()
        .arg(temp_dir.path())
        .args(["-u", "-y"])
        .assert()
        .failure();
}

#[test]
fn test_production_and_dev_only_conflict() {
    let temp_dir = project("{}");
    depaudit()
        .arg(temp_dir.path())
        .args(["-p", "-d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicting options"));
}

#[test]
fn test_invalid_installer() {
    let temp_dir = project("{}");
    depaudit()
        .arg(temp_dir.path())
        .args(["--installer", "bun"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid installer 'bun'"));
}

#[test]
fn test_missing_package_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    depaudit()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("A package.json was not found"));
}

#[test]
fn test_invalid_package_json() {
    let temp_dir = project("{ not json");
    depaudit()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("it is not valid"));
}

#[test]
fn test_missing_usage_report() {
    let temp_dir = project("{}");
    depaudit()
        .arg(temp_dir.path())
        .arg("--usage-report")
        .arg(temp_dir.path().join("depcheck.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read usage report"));
}

#[test]
fn test_no_dependencies_look_amazing() {
    let temp_dir = project(r#"{"name": "empty", "version": "1.0.0"}"#);
    depaudit()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Your modules look amazing. Keep up the great work.",
        ));
}

#[test]
fn test_no_dependencies_json() {
    let temp_dir = project("{}");
    let output = depaudit()
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["packages"].as_array().unwrap().len(), 0);
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_url_dependencies_are_skipped() {
    let temp_dir = project(
        r#"{"dependencies": {"forked": "git+https://github.com/me/forked.git"}}"#,
    );
    depaudit()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Your modules look amazing"));
}

#[test]
fn test_registry_failure_reported_per_package() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#);
    let output = depaudit()
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();

    // Something needs attention, so a report-only run exits 1
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let packages = json["packages"].as_array().unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0]["moduleName"], "left-pad");
    assert!(packages[0]["registryError"].is_string());
    assert_eq!(json["errors"][0]["package"], "left-pad");
}

#[test]
fn test_ignored_package_not_looked_up() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#);
    depaudit()
        .arg(temp_dir.path())
        .args(["--ignore", "left-*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your modules look amazing"));
}

#[test]
fn test_ignore_from_config_file() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#);
    fs::write(temp_dir.path().join(".depauditrc.toml"), "ignore = \"left-pad\"\n").unwrap();
    depaudit()
        .arg(temp_dir.path())
        .assert()
        .success();
}

#[test]
fn test_update_all_shows_registry_errors() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#);
    depaudit()
        .arg(temp_dir.path())
        .arg("-y")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error(left-pad):"))
        .stdout(predicate::str::contains("Your modules look amazing"));
}

#[test]
fn test_update_all_json_carries_errors() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#);
    let output = depaudit()
        .arg(temp_dir.path())
        .args(["-y", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["updated"].as_array().unwrap().len(), 0);
    assert_eq!(json["errors"][0]["package"], "left-pad");
}

#[test]
fn test_x_range_dependency_is_checked() {
    let temp_dir = project(r#"{"dependencies": {"left-pad": "^1.x"}}"#);
    let output = depaudit()
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["packages"][0]["moduleName"], "left-pad");
    assert_eq!(json["packages"][0]["declaredRange"], "^1.x");
}
