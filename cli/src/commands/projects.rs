//! `dockhand projects`: list, edit and operate on project groupings.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::containers::ContainerAction;
use crate::application::services::projects;

/// Projects subcommands.
#[derive(Subcommand)]
pub enum ProjectsCommand {
    /// List manual and compose projects with their containers
    List,
    /// Create a manual project
    Create {
        /// Display name
        name: String,
        /// Member container ids
        ids: Vec<String>,
    },
    /// Rename a manual project
    Rename {
        /// Project id
        id: String,
        /// New display name
        name: String,
    },
    /// Replace the members of a manual project
    Assign {
        /// Project id
        id: String,
        /// Member container ids
        ids: Vec<String>,
    },
    /// Delete a manual project (containers are untouched)
    Remove {
        /// Project id
        id: String,
    },
    /// Start every container of a project
    Start {
        /// Project id
        id: String,
    },
    /// Stop every container of a project
    Stop {
        /// Project id
        id: String,
    },
    /// Restart every container of a project
    Restart {
        /// Project id
        id: String,
    },
}

/// Run the projects command.
///
/// # Errors
///
/// Returns an error if the store or host fails, or the project is unknown.
pub async fn run(app: &AppContext, cmd: ProjectsCommand) -> Result<ExitCode> {
    let store = app.project_store()?;
    match cmd {
        ProjectsCommand::List => {
            let channel = app.channel()?;
            let listing = projects::list_projects(&channel, &store).await?;
            app.renderer().render_projects(&listing)?;
        }
        ProjectsCommand::Create { name, ids } => {
            let project = projects::create_project(&store, &name, ids).await?;
            app.renderer().render_project(&project)?;
        }
        ProjectsCommand::Rename { id, name } => {
            let project = projects::rename_project(&store, &id, &name).await?;
            app.renderer().render_project(&project)?;
        }
        ProjectsCommand::Assign { id, ids } => {
            let project = projects::set_project_containers(&store, &id, ids).await?;
            app.renderer().render_project(&project)?;
        }
        ProjectsCommand::Remove { id } => {
            projects::remove_project(&store, &id).await?;
            if app.is_json() {
                app.renderer().render_text("removed", &id)?;
            } else {
                app.output.success(&format!("Removed project {id}"));
            }
        }
        ProjectsCommand::Start { id } => return lifecycle(app, &id, ContainerAction::Start).await,
        ProjectsCommand::Stop { id } => return lifecycle(app, &id, ContainerAction::Stop).await,
        ProjectsCommand::Restart { id } => {
            return lifecycle(app, &id, ContainerAction::Restart).await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn lifecycle(app: &AppContext, id: &str, action: ContainerAction) -> Result<ExitCode> {
    if action == ContainerAction::Stop && !app.confirm(&format!("Stop every container of {id}?"))? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    let store = app.project_store()?;
    let channel = app.channel()?;
    let outcomes = projects::project_lifecycle(&channel, &store, id, action).await?;
    app.renderer().render_outcomes(&outcomes)?;
    if outcomes.iter().all(|o| o.ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
