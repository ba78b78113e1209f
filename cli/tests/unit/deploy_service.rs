//! Deploy orchestration against a scripted host.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dockhand_cli::application::services::deploy;
use dockhand_cli::domain::error::ValidationError;

use crate::mocks::{RecordingExecutor, RecordingReporter};

fn located() -> RecordingExecutor {
    RecordingExecutor::new()
        .ok("docker ps -a --filter 'label=com.docker.compose.project=shop'", "c0ffee\n")
        .ok("docker inspect c0ffee", "/srv/shop\n")
        .ok("docker compose version", "Docker Compose version v2.29.1\n")
}

#[tokio::test]
async fn fresh_deploy_reports_started_services() {
    let exec = located().ok(
        "cd '/srv/shop'",
        " Container shop-db-1  Started\n Container shop-web-1  Started\n",
    );
    let reporter = RecordingReporter::default();

    let result = deploy::deploy_project(&exec, &reporter, "shop").await.expect("deploy");

    assert!(result.success);
    assert!(result.output.contains("shop-web-1"));
    let events = reporter.events.borrow();
    assert!(events.iter().any(|e| e.contains("locating compose project shop")));
    assert!(events.iter().any(|e| e.contains("docker compose up -d in /srv/shop")));
}

#[tokio::test]
async fn failing_deploy_keeps_the_transcript() {
    let exec = located().respond(
        "cd '/srv/shop'",
        "service \"web\" refers to undefined network front\n",
        "",
        15,
    );
    let result = deploy::deploy_project(&exec, &RecordingReporter::default(), "shop")
        .await
        .expect("a failed deploy is a result, not an error");
    assert!(!result.success);
    assert!(result.output.contains("undefined network"));
}

#[tokio::test]
async fn silent_failure_gets_a_fallback_message() {
    let exec = located().exit("cd '/srv/shop'", 1);
    let result = deploy::deploy_project(&exec, &RecordingReporter::default(), "shop")
        .await
        .expect("result");
    assert!(!result.success);
    assert_eq!(result.output, "Deploy failed");
}

#[tokio::test]
async fn project_name_is_validated_before_lookup() {
    let exec = RecordingExecutor::new();
    let err = deploy::redeploy_project(&exec, &RecordingReporter::default(), "shop; rm -rf /")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::InvalidProjectName(_))
    ));
    assert!(exec.issued().is_empty());
}
