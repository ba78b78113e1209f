//! Container service: command shapes, validation and parsing end to end.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dockhand_cli::application::services::containers::{self, ContainerAction};
use dockhand_cli::application::stream::StreamEvent;
use dockhand_cli::domain::error::{NotFoundError, ValidationError};
use dockhand_common::ResourceLimits;

use crate::mocks::{RecordingExecutor, inventory, ps_line};

const STATS: &str = concat!(
    r#"{"ID":"a1","Name":"web","CPUPerc":"1.25%","MemUsage":"10MiB / 1GiB","MemPerc":"0.98%"}"#,
    "\n",
    "not json at all\n",
);

#[tokio::test]
async fn all_stats_sample_only_running_containers() {
    let exec = RecordingExecutor::new()
        .ok(
            "docker ps -a",
            &inventory(&[
                ps_line("a1", "web", "running", Some("shop")),
                ps_line("b2", "db", "exited", Some("shop")),
            ]),
        )
        .ok("docker stats", STATS);

    let stats = containers::all_container_stats(&exec).await.expect("stats");

    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].mem_usage_bytes, Some(10 * 1024 * 1024));
    let issued = exec.issued_matching("docker stats");
    assert_eq!(issued.len(), 1);
    assert!(issued[0].ends_with(" a1"), "only running ids: {}", issued[0]);
}

#[tokio::test]
async fn stats_for_nothing_running_issues_no_stats_call() {
    let exec = RecordingExecutor::new().ok(
        "docker ps -a",
        &inventory(&[ps_line("b2", "db", "exited", None)]),
    );
    let stats = containers::all_container_stats(&exec).await.expect("stats");
    assert!(stats.is_empty());
    assert!(exec.issued_matching("docker stats").is_empty());
}

#[tokio::test]
async fn injected_id_is_rejected_before_any_remote_call() {
    let exec = RecordingExecutor::new();
    let err = containers::container_action(&exec, ContainerAction::Restart, "web && reboot")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidContainerId(_))
    ));
    assert!(exec.issued().is_empty());
}

#[tokio::test]
async fn resource_update_with_no_limits_never_reaches_docker() {
    let exec = RecordingExecutor::new();
    let err = containers::update_resources(&exec, "a1", &ResourceLimits::default())
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::NoLimits));
    assert!(exec.issued().is_empty());
}

#[tokio::test]
async fn resource_update_issues_both_flags() {
    let exec = RecordingExecutor::new().ok("docker update", "a1\n");
    let limits = ResourceLimits {
        cpus: Some("0.5".into()),
        memory: Some("256m".into()),
    };
    let outcome = containers::update_resources(&exec, "a1", &limits)
        .await
        .expect("update");
    assert_eq!(outcome.command, "docker update --cpus=0.5 --memory=256m a1");
    assert_eq!(exec.issued(), vec![outcome.command]);
}

#[tokio::test]
async fn inspect_of_unknown_container_is_not_found() {
    let exec = RecordingExecutor::new().respond(
        "docker inspect",
        "[]\n",
        "Error: No such object: ghost\n",
        1,
    );
    let err = containers::inspect_container(&exec, "ghost").await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<NotFoundError>(),
        Some(&NotFoundError::Container("ghost".into()))
    );
}

#[tokio::test]
async fn log_tail_is_clamped_and_merges_stderr() {
    let exec = RecordingExecutor::new().ok("docker logs", "line 1\nline 2\n");
    let text = containers::tail_logs(&exec, "a1", Some(1_000_000)).await.expect("logs");
    assert_eq!(text, "line 1\nline 2\n");
    assert_eq!(exec.issued(), vec!["docker logs --tail 10000 a1 2>&1"]);
}

#[tokio::test]
async fn followed_logs_deliver_data_then_close_once() {
    let exec = RecordingExecutor::new().stream_events(vec![
        StreamEvent::Data(b"hello\n".to_vec()),
        StreamEvent::Closed,
    ]);
    let mut handle = containers::stream_logs(&exec, "a1", None).await.expect("stream");

    assert_eq!(exec.issued(), vec!["docker logs --tail 200 -f a1 2>&1"]);
    assert_eq!(handle.next().await, Some(StreamEvent::Data(b"hello\n".to_vec())));
    assert_eq!(handle.next().await, Some(StreamEvent::Closed));
    assert_eq!(handle.next().await, None);
}
