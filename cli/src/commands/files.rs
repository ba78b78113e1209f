//! `dockhand files`: discover, read and edit compose project files.

use std::io::Read as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::compose;
use crate::domain::envfile::{apply_assignments, parse_assignment, parse_env_file, serialize_env_vars};
use crate::domain::error::NotFoundError;
use crate::domain::validate::validate_path;

/// Files subcommands.
#[derive(Subcommand)]
pub enum FilesCommand {
    /// List compose and env files of a compose project
    List {
        /// Compose project name
        project: String,
    },
    /// Print a remote file
    Read {
        /// Absolute path on the host
        path: String,
    },
    /// Replace a remote file with local content (stdin by default)
    Write {
        /// Absolute path on the host
        path: String,
        /// Read the new content from this local file
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Show the variables of a remote env file
    Env {
        /// Absolute path on the host
        path: String,
    },
    /// Set variables in a remote env file
    SetEnv {
        /// Absolute path on the host
        path: String,
        /// KEY=VALUE assignments
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

/// Run the files command.
///
/// # Errors
///
/// Returns a `ValidationError` for unsafe paths, before any remote call.
pub async fn run(app: &AppContext, cmd: FilesCommand) -> Result<ExitCode> {
    match cmd {
        FilesCommand::List { project } => {
            let channel = app.channel()?;
            let dir = compose::find_compose_project_path(&channel, &project)
                .await?
                .ok_or(NotFoundError::WorkingDirectory(project))?;
            let files = compose::list_project_files(&channel, &dir).await?;
            app.renderer().render_files(&files)?;
        }
        FilesCommand::Read { path } => {
            let channel = app.channel()?;
            let content = compose::read_project_file(&channel, &path).await?;
            app.renderer().render_text("content", &content)?;
        }
        FilesCommand::Write { path, from } => {
            validate_path(&path)?;
            let content = read_local(from.as_ref())?;
            let channel = app.channel()?;
            compose::write_project_file(&channel, &path, &content).await?;
            if app.is_json() {
                app.renderer().render_text("written", &path)?;
            } else {
                app.output.success(&format!("Wrote {path}"));
            }
        }
        FilesCommand::Env { path } => {
            let channel = app.channel()?;
            let content = compose::read_project_file(&channel, &path).await?;
            app.renderer().render_env(&path, &parse_env_file(&content))?;
        }
        FilesCommand::SetEnv { path, assignments } => {
            validate_path(&path)?;
            let assignments = assignments
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let channel = app.channel()?;
            let mut vars = parse_env_file(&compose::read_project_file(&channel, &path).await?);
            apply_assignments(&mut vars, assignments);
            compose::write_project_file(&channel, &path, &serialize_env_vars(&vars)).await?;
            app.renderer().render_env(&path, &vars)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_local(from: Option<&PathBuf>) -> Result<String> {
    match from {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("cannot read {}", file.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("cannot read stdin")?;
            Ok(content)
        }
    }
}
