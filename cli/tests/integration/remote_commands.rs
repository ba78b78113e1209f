//! End-to-end runs against a stand-in ssh client.
//!
//! `DOCKHAND_SSH` points at a shell script that executes a canned reply for
//! the remote command it receives as its last argument.

#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::cli_tests::dockhand;

const FAKE_SSH: &str = r#"#!/bin/sh
for last; do :; done
case "$last" in
  "echo ssh-ok")
    echo ssh-ok ;;
  "docker ps -a"*)
    printf '%s\n' '{"ID":"a1","Names":"web","Image":"nginx","State":"running","Status":"Up 2 hours","Labels":"com.docker.compose.project=shop"}'
    printf '%s\n' '{"ID":"c3","Names":"redis","Image":"redis:7","State":"exited","Status":"Exited (0)","Labels":""}' ;;
  "docker stop a1")
    echo a1 ;;
  "docker stop"*)
    echo "Error response from daemon: No such container" >&2; exit 1 ;;
  *)
    echo "unexpected command: $last" >&2; exit 1 ;;
esac
"#;

fn install_fake_ssh(home: &TempDir) -> PathBuf {
    let path = home.path().join("fake-ssh");
    std::fs::write(&path, FAKE_SSH).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn connected(home: &TempDir) -> Command {
    let ssh = install_fake_ssh(home);
    let mut cmd = dockhand(home);
    cmd.env("VPS_HOST", "vps.example.com")
        .env("VPS_USERNAME", "deploy")
        .env("VPS_PRIVATE_KEY_PATH", "/nonexistent/id_ed25519")
        .env("DOCKHAND_SSH", ssh);
    cmd
}

#[test]
fn test_ping_reports_reachable_host() {
    let home = TempDir::new().unwrap();
    connected(&home)
        .arg("ping")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy@vps.example.com reachable"));
}

#[test]
fn test_ping_json_returns_reply() {
    let home = TempDir::new().unwrap();
    let output = connected(&home).args(["ping", "--json"]).output().unwrap();
    assert!(output.status.success(), "{output:?}");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["reply"], "ssh-ok");
}

#[test]
fn test_ps_json_lists_containers_with_project() {
    let home = TempDir::new().unwrap();
    let output = connected(&home).args(["ps", "--json"]).output().unwrap();
    assert!(output.status.success(), "{output:?}");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "a1");
    assert_eq!(rows[0]["composeProject"], "shop");
    assert!(rows[1].get("composeProject").is_none());
}

#[test]
fn test_ps_human_shows_names() {
    let home = TempDir::new().unwrap();
    connected(&home)
        .arg("ps")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("redis"));
}

#[test]
fn test_projects_list_groups_by_compose_label() {
    let home = TempDir::new().unwrap();
    let output = connected(&home)
        .args(["projects", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let auto = body["autoProjects"].as_array().unwrap();
    let ids: Vec<&str> = auto
        .iter()
        .map(|p| p["project"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["auto:shop", "standalone"]);
}

#[test]
fn test_stop_surfaces_docker_error() {
    let home = TempDir::new().unwrap();
    let output = connected(&home)
        .args(["stop", "zz9", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["code"], "command");
    assert!(body["message"].as_str().unwrap().contains("No such container"));
}

#[test]
fn test_stop_succeeds() {
    let home = TempDir::new().unwrap();
    connected(&home).args(["stop", "a1"]).assert().success();
}
