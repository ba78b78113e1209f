//! Application service: project listing, resolution and lifecycle.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::Result;
use dockhand_common::{ActionOutcome, Project, ProjectListing, ProjectWithContainers};
use futures_util::future::join_all;

use crate::application::ports::{ProjectStore, ProjectUpdate, RemoteExecutor};
use crate::application::services::containers::{ContainerAction, container_action, list_containers};
use crate::domain::error::{NotFoundError, ValidationError};
use crate::domain::project::{attach_containers, group_auto_projects};
use crate::domain::validate::sanitize_container_id;

/// Manual projects from the store and auto projects from the inventory.
///
/// # Errors
///
/// Propagates inventory and store failures.
pub async fn list_projects(
    exec: &impl RemoteExecutor,
    store: &impl ProjectStore,
) -> Result<ProjectListing> {
    let (containers, manual) = tokio::join!(list_containers(exec), store.list());
    let containers = containers?;
    Ok(ProjectListing {
        manual_projects: attach_containers(manual?, &containers),
        auto_projects: group_auto_projects(&containers),
    })
}

/// Look a project up by id, manual projects first.
///
/// # Errors
///
/// Returns `NotFoundError::Project` when no project has this id.
pub async fn resolve_project(
    exec: &impl RemoteExecutor,
    store: &impl ProjectStore,
    id: &str,
) -> Result<ProjectWithContainers> {
    let listing = list_projects(exec, store).await?;
    listing
        .manual_projects
        .into_iter()
        .chain(listing.auto_projects)
        .find(|p| p.project.id == id)
        .ok_or_else(|| NotFoundError::Project(id.to_string()).into())
}

/// Apply `action` to every member concurrently.
///
/// Members are independent: one failure does not stop or undo the others,
/// and each outcome is reported.
///
/// # Errors
///
/// Fails only when the project cannot be resolved.
pub async fn project_lifecycle(
    exec: &impl RemoteExecutor,
    store: &impl ProjectStore,
    id: &str,
    action: ContainerAction,
) -> Result<Vec<ActionOutcome>> {
    let project = resolve_project(exec, store, id).await?;
    tracing::info!(project = id, %action, members = project.containers.len(), "project lifecycle");
    let calls = project
        .containers
        .iter()
        .map(|c| container_action(exec, action, &c.id));
    let outcomes = join_all(calls)
        .await
        .into_iter()
        .zip(&project.containers)
        .map(|(result, container)| match result {
            Ok(_) => ActionOutcome {
                id: container.id.clone(),
                ok: true,
                message: format!("{} {}", container.name, action.done()),
            },
            Err(err) => ActionOutcome {
                id: container.id.clone(),
                ok: false,
                message: err.to_string(),
            },
        })
        .collect();
    Ok(outcomes)
}

fn check_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidProjectName(name.to_string()).into());
    }
    Ok(name.to_string())
}

/// Create a manual project grouping `container_ids`.
///
/// # Errors
///
/// Returns a `ValidationError` for an empty name or malformed id.
pub async fn create_project(
    store: &impl ProjectStore,
    name: &str,
    container_ids: Vec<String>,
) -> Result<Project> {
    let name = check_name(name)?;
    for id in &container_ids {
        sanitize_container_id(id)?;
    }
    store.create(&name, container_ids).await
}

/// Rename a manual project.
///
/// # Errors
///
/// Returns a `ValidationError` for an empty name and `NotFoundError` for
/// an unknown id.
pub async fn rename_project(store: &impl ProjectStore, id: &str, name: &str) -> Result<Project> {
    let name = check_name(name)?;
    store
        .update(
            id,
            ProjectUpdate {
                name: Some(name),
                container_ids: None,
            },
        )
        .await
}

/// Replace the member list of a manual project.
///
/// # Errors
///
/// Returns a `ValidationError` for a malformed id and `NotFoundError` for
/// an unknown project.
pub async fn set_project_containers(
    store: &impl ProjectStore,
    id: &str,
    container_ids: Vec<String>,
) -> Result<Project> {
    for container in &container_ids {
        sanitize_container_id(container)?;
    }
    store
        .update(
            id,
            ProjectUpdate {
                name: None,
                container_ids: Some(container_ids),
            },
        )
        .await
}

/// Delete a manual project.
///
/// # Errors
///
/// Returns `NotFoundError::Project` for an unknown id.
pub async fn remove_project(store: &impl ProjectStore, id: &str) -> Result<()> {
    if !store.remove(id).await? {
        return Err(NotFoundError::Project(id.to_string()).into());
    }
    Ok(())
}
