//! Application service: compose deploy and redeploy.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::Result;
use dockhand_common::DeployResult;

use crate::application::ports::{ProgressReporter, RemoteExecutor};
use crate::application::services::compose::find_compose_project_path;
use crate::domain::deploy::{
    COMPOSE_PROBE_COMMAND, ComposeInvocation, classify_deploy, classify_redeploy, deploy_command,
    redeploy_command,
};
use crate::domain::error::NotFoundError;
use crate::domain::exec::ExecResult;

/// Probe for the compose v2 plugin. Runs on every call.
///
/// # Errors
///
/// Propagates connection errors.
pub async fn detect_compose(exec: &impl RemoteExecutor) -> Result<ComposeInvocation> {
    let probe = exec.execute(COMPOSE_PROBE_COMMAND).await?;
    let compose = ComposeInvocation::from_probe(&probe);
    tracing::debug!(?compose, "compose invocation detected");
    Ok(compose)
}

async fn project_dir(
    exec: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    project: &str,
) -> Result<String> {
    reporter.step(&format!("locating compose project {project}..."));
    find_compose_project_path(exec, project)
        .await?
        .ok_or_else(|| NotFoundError::Project(project.to_string()).into())
}

fn into_result(result: &ExecResult, success: bool, fallback: &str) -> DeployResult {
    let output = result.combined_text();
    let output = if output.trim().is_empty() {
        fallback.to_string()
    } else {
        output
    };
    DeployResult { output, success }
}

/// `up -d` in the project's working directory.
///
/// A nonzero exit still counts as success when compose reports the
/// services as already up.
///
/// # Errors
///
/// Returns `NotFoundError::Project` when the project directory cannot be
/// resolved, and propagates connection errors. A failed deploy is not an
/// error; inspect [`DeployResult::success`].
pub async fn deploy_project(
    exec: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    project: &str,
) -> Result<DeployResult> {
    let dir = project_dir(exec, reporter, project).await?;
    let compose = detect_compose(exec).await?;
    reporter.step(&format!("running {} up -d in {dir}...", compose.program()));
    tracing::info!(project, %dir, "deploying");
    let result = exec.execute(&deploy_command(&dir, compose)).await?;
    let success = classify_deploy(&result);
    if !success {
        tracing::warn!(project, exit = ?result.exit_status, "deploy failed");
    }
    Ok(into_result(
        &result,
        success,
        if success { "Deploy completed" } else { "Deploy failed" },
    ))
}

/// Pull images, then force-recreate the services. Any nonzero exit is a
/// failure.
///
/// # Errors
///
/// Same as [`deploy_project`].
pub async fn redeploy_project(
    exec: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    project: &str,
) -> Result<DeployResult> {
    let dir = project_dir(exec, reporter, project).await?;
    let compose = detect_compose(exec).await?;
    reporter.step(&format!("pulling and recreating with {} in {dir}...", compose.program()));
    tracing::info!(project, %dir, "redeploying");
    let result = exec.execute(&redeploy_command(&dir, compose)).await?;
    let success = classify_redeploy(&result);
    if !success {
        tracing::warn!(project, exit = ?result.exit_status, "redeploy failed");
    }
    Ok(into_result(
        &result,
        success,
        if success { "Redeploy completed" } else { "Redeploy failed" },
    ))
}
