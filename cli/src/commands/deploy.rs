//! `dockhand deploy` / `dockhand redeploy`.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy as deploy_service;
use crate::domain::validate::sanitize_project_name;

/// Bring a compose project up.
///
/// # Errors
///
/// Returns an error when the project directory cannot be resolved or the
/// host cannot be reached. A failed `up` exits nonzero without an error.
pub async fn deploy(app: &AppContext, project: &str) -> Result<ExitCode> {
    sanitize_project_name(project)?;
    let channel = app.channel()?;
    let result = deploy_service::deploy_project(&channel, &app.reporter(), project).await?;
    app.renderer().render_deploy(&result)?;
    Ok(exit_code(result.success))
}

/// Pull and force-recreate a compose project after confirmation.
///
/// # Errors
///
/// Same as [`deploy()`].
pub async fn redeploy(app: &AppContext, project: &str) -> Result<ExitCode> {
    sanitize_project_name(project)?;
    if !app.confirm(&format!("Pull images and recreate every service of {project}?"))? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    let channel = app.channel()?;
    let result = deploy_service::redeploy_project(&channel, &app.reporter(), project).await?;
    app.renderer().render_deploy(&result)?;
    Ok(exit_code(result.success))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
