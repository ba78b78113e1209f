//! Application service: container inventory, metrics and lifecycle.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through the injected `RemoteExecutor`.

use std::fmt;

use anyhow::Result;
use dockhand_common::{ContainerInspect, ContainerRecord, ContainerStats, ResourceLimits};
use serde::Serialize;

use crate::application::ports::RemoteExecutor;
use crate::application::stream::StreamHandle;
use crate::domain::error::NotFoundError;
use crate::domain::inspect::{InspectOutcome, parse_inspect};
use crate::domain::inventory::{INVENTORY_COMMAND, parse_inventory};
use crate::domain::stats::parse_stats;
use crate::domain::validate::{clamp_tail_lines, sanitize_container_id, validate_resource_limits};

/// Lifecycle verbs that map one-to-one onto docker subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    #[must_use]
    pub fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Past tense, for progress messages.
    #[must_use]
    pub fn done(self) -> &'static str {
        match self {
            Self::Start => "started",
            Self::Stop => "stopped",
            Self::Restart => "restarted",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Outcome of a `docker update` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceUpdateOutcome {
    pub command: String,
    pub output: String,
}

/// Every container on the host, running or not.
///
/// # Errors
///
/// Propagates connection errors, and a `CommandError` if `docker ps` fails.
pub async fn list_containers(exec: &impl RemoteExecutor) -> Result<Vec<ContainerRecord>> {
    let result = exec
        .execute(INVENTORY_COMMAND)
        .await?
        .ensure_success("Failed to list containers")?;
    let records = parse_inventory(&result.stdout_text());
    tracing::debug!(count = records.len(), "inventory parsed");
    Ok(records)
}

/// Point-in-time stats for `ids`. Ids of stopped or unknown containers
/// produce no entry.
///
/// # Errors
///
/// Returns a `ValidationError` for a malformed id before anything is sent,
/// and propagates connection errors.
pub async fn container_stats(
    exec: &impl RemoteExecutor,
    ids: &[String],
) -> Result<Vec<ContainerStats>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    for id in ids {
        sanitize_container_id(id)?;
    }
    let command = format!(
        "docker stats --no-stream --format '{{{{json .}}}}' {}",
        ids.join(" ")
    );
    let result = exec.execute(&command).await?;
    if !result.success() {
        tracing::debug!(stderr = %result.stderr_text().trim(), "docker stats reported failure");
    }
    Ok(parse_stats(&result.stdout_text()))
}

/// Stats for every running container.
///
/// # Errors
///
/// Propagates errors from [`list_containers`] and [`container_stats`].
pub async fn all_container_stats(exec: &impl RemoteExecutor) -> Result<Vec<ContainerStats>> {
    let running: Vec<String> = list_containers(exec)
        .await?
        .into_iter()
        .filter(ContainerRecord::is_running)
        .map(|c| c.id)
        .collect();
    container_stats(exec, &running).await
}

/// Environment and resource limits of one container.
///
/// # Errors
///
/// Returns `NotFoundError::Container` when docker knows no such container,
/// and a `CommandError` if inspect fails without printing JSON.
pub async fn inspect_container(exec: &impl RemoteExecutor, id: &str) -> Result<ContainerInspect> {
    let id = sanitize_container_id(id)?;
    let result = exec.execute(&format!("docker inspect {id}")).await?;
    match parse_inspect(&result.stdout_text()) {
        InspectOutcome::Found(inspect) => Ok(inspect),
        InspectOutcome::Missing => Err(NotFoundError::Container(id.to_string()).into()),
        InspectOutcome::Malformed(empty) => {
            result.ensure_success("Failed to inspect container")?;
            Ok(empty)
        }
    }
}

/// Start, stop or restart one container. Returns docker's echo of the id.
///
/// # Errors
///
/// Returns a `ValidationError` for a malformed id, a `CommandError` when
/// docker refuses.
pub async fn container_action(
    exec: &impl RemoteExecutor,
    action: ContainerAction,
    id: &str,
) -> Result<String> {
    let id = sanitize_container_id(id)?;
    tracing::info!(%action, id, "container lifecycle");
    let result = exec
        .execute(&format!("docker {} {id}", action.verb()))
        .await?
        .ensure_success(&format!("Failed to {action} container"))?;
    Ok(result.stdout_text().trim().to_string())
}

fn logs_command(id: &str, lines: Option<u32>, follow: bool) -> String {
    let tail = clamp_tail_lines(lines);
    let follow = if follow { " -f" } else { "" };
    format!("docker logs --tail {tail}{follow} {id} 2>&1")
}

/// The last `lines` log lines (default 200, at most 10000), stderr merged.
///
/// # Errors
///
/// Returns a `CommandError` when docker cannot read the logs.
pub async fn tail_logs(exec: &impl RemoteExecutor, id: &str, lines: Option<u32>) -> Result<String> {
    let id = sanitize_container_id(id)?;
    let result = exec
        .execute(&logs_command(id, lines, false))
        .await?
        .ensure_success("Failed to fetch logs")?;
    Ok(result.stdout_text())
}

/// Follow the log of one container until the handle is closed.
///
/// # Errors
///
/// Returns a `ValidationError` for a malformed id and propagates transport
/// start-up failures.
pub async fn stream_logs(
    exec: &impl RemoteExecutor,
    id: &str,
    lines: Option<u32>,
) -> Result<StreamHandle> {
    let id = sanitize_container_id(id)?;
    exec.stream(&logs_command(id, lines, true)).await
}

/// Apply cpu and/or memory limits to a container.
///
/// # Errors
///
/// Returns a `ValidationError` before any remote call when the limits or
/// id are malformed, and a `CommandError` when docker rejects the update.
pub async fn update_resources(
    exec: &impl RemoteExecutor,
    id: &str,
    limits: &ResourceLimits,
) -> Result<ResourceUpdateOutcome> {
    let update = validate_resource_limits(limits)?;
    let id = sanitize_container_id(id)?;
    let command = format!("docker update {} {id}", update.flags().join(" "));
    tracing::info!(%command, "updating container resources");
    let result = exec
        .execute(&command)
        .await?
        .ensure_success("Failed to update container")?;
    Ok(ResourceUpdateOutcome {
        command,
        output: result.stdout_text().trim().to_string(),
    })
}
