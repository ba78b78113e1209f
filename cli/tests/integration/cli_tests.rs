//! Argument parsing, version output and local validation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `dockhand` invocation isolated from the caller's environment.
pub fn dockhand(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dockhand"));
    cmd.env("NO_COLOR", "1")
        .env("DOCKHAND_CONFIG", home.path().join("config.yaml"))
        .env("DOCKHAND_PROJECTS", home.path().join("projects.json"))
        .env_remove("RUST_LOG")
        .env_remove("SSH_CONNECT_TIMEOUT_MS");
    for var in [
        "VPS_HOST",
        "VPS_PORT",
        "VPS_USERNAME",
        "VPS_PASSWORD",
        "VPS_PRIVATE_KEY",
        "VPS_PRIVATE_KEY_PATH",
        "VPS_PRIVATE_KEY_PASSPHRASE",
        "VPS_CONNECT_TIMEOUT_MS",
        "VPS_KNOWN_HOSTS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Settings that pass validation but point at a client that cannot start.
pub fn unreachable_host(cmd: &mut Command) -> &mut Command {
    cmd.env("VPS_HOST", "vps.example.com")
        .env("VPS_USERNAME", "deploy")
        .env("VPS_PRIVATE_KEY_PATH", "/nonexistent/id_ed25519")
        .env("DOCKHAND_SSH", "/nonexistent/ssh")
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_no_args_shows_help_and_exits_two() {
    let home = TempDir::new().unwrap();
    // An env-provided flag counts as an argument and would suppress the help.
    dockhand(&home)
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Operate docker containers"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    dockhand(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("redeploy"))
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn test_version_flag_shows_version() {
    let home = TempDir::new().unwrap();
    dockhand(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_json_is_an_object() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home).args(["version", "--json"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_color_accepts_any_value() {
    let home = TempDir::new().unwrap();
    for value in ["1", "yes", "anything"] {
        let output = dockhand(&home)
            .env("NO_COLOR", value)
            .args(["version", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success(), "NO_COLOR={value}: {output:?}");
        assert_eq!(json_stdout(&output)["version"], env!("CARGO_PKG_VERSION"));
    }
}

#[test]
fn test_no_color_output_has_no_escape_codes() {
    let home = TempDir::new().unwrap();
    dockhand(&home)
        .env("NO_COLOR", "1")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_unknown_subcommand_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    dockhand(&home).arg("launch").assert().code(2);
}

#[test]
fn test_update_without_limits_fails_before_connecting() {
    let home = TempDir::new().unwrap();
    let output = unreachable_host(&mut dockhand(&home))
        .args(["update", "a1", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let body = json_stdout(&output);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "validation");
}

#[test]
fn test_inspect_rejects_shell_metacharacters() {
    let home = TempDir::new().unwrap();
    let output = unreachable_host(&mut dockhand(&home))
        .args(["inspect", "a1;reboot", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_stdout(&output)["code"], "validation");
}

#[test]
fn test_invalid_input_is_reported_before_configuration() {
    let home = TempDir::new().unwrap();
    let cases: [&[&str]; 5] = [
        &["update", "x", "--cpus", "0"],
        &["inspect", "a;b"],
        &["stop", "$(reboot)"],
        &["logs", "a b"],
        &["deploy", "shop && reboot"],
    ];
    for args in cases {
        let output = dockhand(&home).args(args).arg("--json").output().unwrap();
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        assert_eq!(json_stdout(&output)["code"], "validation", "{args:?}");
    }
}

#[test]
fn test_missing_host_is_a_config_error() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home).args(["ps", "--json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let body = json_stdout(&output);
    assert_eq!(body["code"], "config");
    assert!(body["message"].as_str().unwrap().contains("VPS_HOST"));
}

#[test]
fn test_missing_client_is_reported_in_human_mode() {
    let home = TempDir::new().unwrap();
    unreachable_host(&mut dockhand(&home))
        .arg("ps")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_manual_project_create_needs_no_connection() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home)
        .args(["projects", "create", "Edge", "a1", "b2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let project = json_stdout(&output);
    assert_eq!(project["name"], "Edge");
    assert_eq!(project["source"], "manual");
    assert_eq!(project["containerIds"], serde_json::json!(["a1", "b2"]));

    let stored = std::fs::read_to_string(home.path().join("projects.json")).unwrap();
    assert!(stored.contains("\"containerIds\""));
}

#[test]
fn test_project_remove_unknown_is_not_found() {
    let home = TempDir::new().unwrap();
    let output = dockhand(&home)
        .args(["projects", "remove", "manual-missing", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_stdout(&output)["code"], "not_found");
}
