//! CLI integration tests for the repolens binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn repolens() -> Command {
    Command::cargo_bin("repolens").unwrap()
}

#[test]
fn help_lists_core_flags() {
    repolens()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--repos"))
        .stdout(predicate::str::contains("--organization"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn version_prints() {
    repolens()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repolens"));
}

#[test]
fn no_repositories_configured_fails() {
    let dir = TempDir::new().unwrap();
    repolens()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repositories are configured"));
}

#[test]
fn organization_source_without_name_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("repolens.toml"),
        "[repositories]\nsource = \"organization\"\n",
    )
    .unwrap();

    repolens()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no organization is configured"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    repolens()
        .current_dir(dir.path())
        .args(["--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn invalid_format_rejected_by_clap() {
    repolens()
        .args(["--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn conflicting_sources_rejected() {
    repolens()
        .args(["--repos", "a/b", "--organization", "org"])
        .assert()
        .failure();
}
