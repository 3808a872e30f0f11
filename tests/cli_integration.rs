//! CLI integration tests
//!
//! Exercises the binary end to end: exit codes, stdout/stderr split, and the
//! files left behind in the repository.

mod support;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use support::{checkout_fixture, circle_migrate_binary};

fn run(args: &[&str], cwd: Option<&Path>) -> Output {
    let mut command = Command::new(circle_migrate_binary());
    command
        .args(args)
        .env("CIRCLE_MIGRATE_SCAN_BACKEND", "builtin")
        .env_remove("CIRCLE_MIGRATE_ORG")
        .env_remove("CIRCLE_MIGRATE_CI_SCRIPTS_URL")
        .env_remove("RUST_LOG");
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    command.output().expect("Failed to execute circle-migrate")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("migrate"));
    assert!(stdout.contains("detect"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_migrate_current_directory() {
    let (_dir, repo) = checkout_fixture("go-postgres");

    let output = run(&["migrate"], Some(&repo));

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let config = fs::read_to_string(repo.join(".circleci/config.yml")).unwrap();
    assert!(config.starts_with("version: 2\n"));
    assert!(config.contains("working_directory: /go/src/github.com/Clever/go-postgres"));
    assert!(repo.join("circle.yml.bak").is_file());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote"));
}

#[test]
fn test_migrate_dry_run_prints_yaml_only() {
    let (_dir, repo) = checkout_fixture("wag-service");

    let output = run(&["-q", "migrate", repo.to_str().unwrap(), "--dry-run"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_yaml::Value = serde_yaml::from_str(&stdout).unwrap();
    assert_eq!(parsed["version"].as_u64(), Some(2));
    assert!(!repo.join(".circleci").exists());
    assert!(repo.join("circle.yml").is_file());
}

#[test]
fn test_migrate_with_org_and_output() {
    let (dir, repo) = checkout_fixture("python-lint");
    let target = dir.path().join("out.yml");

    let output = run(
        &[
            "migrate",
            repo.to_str().unwrap(),
            "--org",
            "acme",
            "--output",
            target.to_str().unwrap(),
            "--no-rename",
        ],
        None,
    );

    assert!(output.status.success());
    let config = fs::read_to_string(&target).unwrap();
    assert!(config.contains("working_directory: ~/acme/python-lint"));
    assert!(repo.join("circle.yml").is_file());
}

#[test]
fn test_migrate_invalid_deploy_key_exits_nonzero() {
    let (_dir, repo) = checkout_fixture("bad-deploy");

    let output = run(&["migrate", repo.to_str().unwrap()], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unexpected key in `deployment` map = production"));
    assert!(!repo.join(".circleci").exists());
}

#[test]
fn test_migrate_missing_circle_yml() {
    let dir = tempfile::TempDir::new().unwrap();

    let output = run(&["migrate", dir.path().to_str().unwrap()], None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("circle.yml not found"));
}

#[test]
fn test_detect_json() {
    let (_dir, repo) = checkout_fixture("node-mongo");

    let output = run(&["detect", repo.to_str().unwrap(), "--format", "json"], None);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["constraints"]["app_type"], "node");
    assert_eq!(report["constraints"]["version"], "6");
    assert_eq!(report["working_directory"], "~/Clever/node-mongo");
    assert!(repo.join("circle.yml").is_file());
}

#[test]
fn test_detect_human() {
    let (_dir, repo) = checkout_fixture("go-postgres");

    let output = run(&["detect", repo.to_str().unwrap()], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("App type:      Go"));
    assert!(stdout.contains("circleci/postgres:9.4-alpine-ram"));
}

#[test]
fn test_invalid_scan_backend_env() {
    let (_dir, repo) = checkout_fixture("python-lint");

    let output = Command::new(circle_migrate_binary())
        .args(["detect", repo.to_str().unwrap()])
        .env("CIRCLE_MIGRATE_SCAN_BACKEND", "ripgrep")
        .output()
        .expect("Failed to execute circle-migrate");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid scan backend: ripgrep"));
}
