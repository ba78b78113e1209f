//! Project listing and lifecycle over the JSON store and a scripted host.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dockhand_cli::application::ports::ProjectStore;
use dockhand_cli::application::services::containers::ContainerAction;
use dockhand_cli::application::services::projects;
use dockhand_cli::domain::error::NotFoundError;
use dockhand_cli::infra::project_store::JsonProjectStore;
use dockhand_common::ProjectSource;

use crate::mocks::{RecordingExecutor, inventory, ps_line};

fn store() -> (tempfile::TempDir, JsonProjectStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonProjectStore::with_path(dir.path().join("projects.json"));
    (dir, store)
}

fn host() -> RecordingExecutor {
    RecordingExecutor::new().ok(
        "docker ps -a",
        &inventory(&[
            ps_line("a1", "web", "running", Some("shop")),
            ps_line("c3", "cron", "running", None),
            ps_line("b2", "db", "running", Some("shop")),
            ps_line("d4", "blog", "exited", Some("blog")),
        ]),
    )
}

#[tokio::test]
async fn auto_projects_follow_first_appearance_with_standalone_last() {
    let (_dir, store) = store();
    let listing = projects::list_projects(&host(), &store).await.expect("listing");

    let ids: Vec<&str> = listing
        .auto_projects
        .iter()
        .map(|p| p.project.id.as_str())
        .collect();
    assert_eq!(ids, vec!["auto:shop", "auto:blog", "standalone"]);
    assert_eq!(listing.auto_projects[0].project.container_ids, vec!["a1", "b2"]);
    assert!(listing.manual_projects.is_empty());
}

#[tokio::test]
async fn compose_project_named_standalone_resolves_separately() {
    let (_dir, store) = store();
    let exec = RecordingExecutor::new().ok(
        "docker ps -a",
        &inventory(&[
            ps_line("a1", "web", "running", Some("standalone")),
            ps_line("c3", "cron", "running", None),
        ]),
    );

    let labelled = projects::resolve_project(&exec, &store, "auto:standalone")
        .await
        .expect("labelled");
    let unlabelled = projects::resolve_project(&exec, &store, "standalone")
        .await
        .expect("unlabelled");

    assert_eq!(labelled.project.container_ids, vec!["a1"]);
    assert_eq!(labelled.project.compose_project.as_deref(), Some("standalone"));
    assert_eq!(unlabelled.project.container_ids, vec!["c3"]);
    assert!(unlabelled.project.compose_project.is_none());
}

#[tokio::test]
async fn manual_project_members_are_taken_from_inventory() {
    let (_dir, store) = store();
    let created = projects::create_project(&store, "Edge", vec!["c3".into(), "gone".into()])
        .await
        .expect("create");

    let listing = projects::list_projects(&host(), &store).await.expect("listing");

    let manual = &listing.manual_projects[0];
    assert_eq!(manual.project.id, created.id);
    assert_eq!(manual.project.source, ProjectSource::Manual);
    let members: Vec<&str> = manual.containers.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(members, vec!["c3"]);
}

#[tokio::test]
async fn lifecycle_acts_on_every_member() {
    let (_dir, store) = store();
    let exec = host()
        .ok("docker restart a1", "a1\n")
        .ok("docker restart b2", "b2\n");

    let outcomes = projects::project_lifecycle(&exec, &store, "auto:shop", ContainerAction::Restart)
        .await
        .expect("outcomes");

    assert!(outcomes.iter().all(|o| o.ok));
    let mut restarts = exec.issued_matching("docker restart");
    restarts.sort();
    assert_eq!(restarts, vec!["docker restart a1", "docker restart b2"]);
}

#[tokio::test]
async fn lifecycle_of_unknown_project_touches_nothing() {
    let (_dir, store) = store();
    let exec = host();
    let err = projects::project_lifecycle(&exec, &store, "auto:nope", ContainerAction::Stop)
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<NotFoundError>().is_some());
    assert!(exec.issued_matching("docker stop").is_empty());
}

#[tokio::test]
async fn rename_and_remove_persist() {
    let (_dir, store) = store();
    let created = projects::create_project(&store, "Edge", vec![]).await.expect("create");
    projects::rename_project(&store, &created.id, "Edge proxies")
        .await
        .expect("rename");
    assert_eq!(store.list().await.expect("list")[0].name, "Edge proxies");

    projects::remove_project(&store, &created.id).await.expect("remove");
    assert!(store.list().await.expect("list").is_empty());
    let err = projects::remove_project(&store, &created.id).await.unwrap_err();
    assert!(err.downcast_ref::<NotFoundError>().is_some());
}
