//! Integration tests for `dockhand config`.
//!
//! Every test points `DOCKHAND_CONFIG` at a temp path so nothing touches
//! `~/.dockhand/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::cli_tests::dockhand;

#[test]
fn test_config_help_shows_subcommands() {
    let home = TempDir::new().unwrap();
    dockhand(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_path_follows_env_override() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("config.yaml");
    dockhand(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn test_config_show_defaults_without_file() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home).args(["config", "show", "--json"]).output().unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["ssh"]["port"], 22);
    assert_eq!(body["ssh"]["connect_timeout_ms"], 15_000);
    assert!(body["ssh"]["host"].is_null());
}

#[test]
fn test_config_show_merges_env_and_redacts_secrets() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        "ssh:\n  host: file.example.com\n  username: deploy\n  password: hunter2\n",
    )
    .unwrap();
    let output = dockhand(&home)
        .env("VPS_HOST", "env.example.com")
        .env("VPS_PORT", "2222")
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("hunter2"), "password leaked: {stdout}");
    let body: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["ssh"]["host"], "env.example.com");
    assert_eq!(body["ssh"]["port"], 2222);
    assert_eq!(body["ssh"]["username"], "deploy");
    assert_eq!(body["ssh"]["password"], "<redacted>");
}

#[test]
fn test_config_show_human_redacts_secrets() {
    let home = TempDir::new().unwrap();
    dockhand(&home)
        .env("VPS_PASSWORD", "hunter2")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_config_invalid_yaml_is_a_config_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.yaml"), "ssh: [unclosed\n").unwrap();
    dockhand(&home)
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_legacy_timeout_variable_is_honoured() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home)
        .env("SSH_CONNECT_TIMEOUT_MS", "4000")
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["ssh"]["connect_timeout_ms"], 4000);
}
