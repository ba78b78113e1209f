//! Container commands: `ps`, `stats`, `inspect`, `start|stop|restart`,
//! `logs` and `update`.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use dockhand_common::ResourceLimits;
use tokio::io::AsyncWriteExt as _;

use crate::app::AppContext;
use crate::application::services::containers::{self, ContainerAction};
use crate::application::stream::{StreamEvent, StreamHandle};
use crate::domain::error::CommandError;
use crate::domain::validate::{sanitize_container_id, validate_resource_limits};

/// Arguments for `dockhand stats`.
#[derive(Args)]
pub struct StatsArgs {
    /// Containers to sample (default: every running container)
    pub ids: Vec<String>,
}

/// Arguments for `dockhand logs`.
#[derive(Args)]
pub struct LogsArgs {
    /// Container id or name
    pub id: String,

    /// Number of lines to show from the end (1-10000)
    #[arg(short = 'n', long)]
    pub tail: Option<u32>,

    /// Keep streaming new output until interrupted
    #[arg(short, long)]
    pub follow: bool,
}

/// Arguments for `dockhand update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Container id or name
    pub id: String,

    /// CPU limit, e.g. 1.5
    #[arg(long)]
    pub cpus: Option<String>,

    /// Memory limit, e.g. 512m
    #[arg(long)]
    pub memory: Option<String>,
}

/// List every container on the host.
///
/// # Errors
///
/// Returns an error if the host cannot be reached or docker fails.
pub async fn ps(app: &AppContext) -> Result<ExitCode> {
    let channel = app.channel()?;
    let containers = containers::list_containers(&channel).await?;
    app.renderer().render_containers(&containers)?;
    Ok(ExitCode::SUCCESS)
}

/// Sample cpu and memory usage.
///
/// # Errors
///
/// Returns an error for malformed ids or when the host cannot be reached.
pub async fn stats(app: &AppContext, args: &StatsArgs) -> Result<ExitCode> {
    for id in &args.ids {
        sanitize_container_id(id)?;
    }
    let channel = app.channel()?;
    let stats = if args.ids.is_empty() {
        containers::all_container_stats(&channel).await?
    } else {
        containers::container_stats(&channel, &args.ids).await?
    };
    app.renderer().render_stats(&stats)?;
    Ok(ExitCode::SUCCESS)
}

/// Show environment and limits of one container.
///
/// # Errors
///
/// Returns `NotFoundError::Container` when docker has no such container.
pub async fn inspect(app: &AppContext, id: &str) -> Result<ExitCode> {
    sanitize_container_id(id)?;
    let channel = app.channel()?;
    let inspect = containers::inspect_container(&channel, id).await?;
    app.renderer().render_inspect(&inspect)?;
    Ok(ExitCode::SUCCESS)
}

/// Start, stop or restart one container.
///
/// # Errors
///
/// Returns an error for a malformed id or when docker refuses.
pub async fn lifecycle(app: &AppContext, action: ContainerAction, id: &str) -> Result<ExitCode> {
    sanitize_container_id(id)?;
    let channel = app.channel()?;
    containers::container_action(&channel, action, id).await?;
    if app.is_json() {
        app.renderer().render_outcomes(&[dockhand_common::ActionOutcome {
            id: id.to_string(),
            ok: true,
            message: format!("{id} {}", action.done()),
        }])?;
    } else {
        app.output.success(&format!("{id} {}", action.done()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the log tail, or follow it until Ctrl-C.
///
/// # Errors
///
/// Returns an error for a malformed id or when the host cannot be reached.
pub async fn logs(app: &AppContext, args: &LogsArgs) -> Result<ExitCode> {
    sanitize_container_id(&args.id)?;
    let channel = app.channel()?;
    if !args.follow {
        let text = containers::tail_logs(&channel, &args.id, args.tail).await?;
        app.renderer().render_text("logs", &text)?;
        return Ok(ExitCode::SUCCESS);
    }
    let handle = containers::stream_logs(&channel, &args.id, args.tail).await?;
    follow(handle).await
}

/// Copy stream output to stdout until the stream closes or Ctrl-C.
async fn follow(mut handle: StreamHandle) -> Result<ExitCode> {
    let mut stdout = tokio::io::stdout();
    let mut failure = None;
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupted = false;
    loop {
        tokio::select! {
            event = handle.next() => match event {
                Some(StreamEvent::Data(bytes)) => {
                    stdout.write_all(&bytes).await.context("writing logs")?;
                    stdout.flush().await.context("writing logs")?;
                }
                Some(StreamEvent::Error(message)) => failure = Some(message),
                Some(StreamEvent::Closed) | None => break,
            },
            _ = &mut interrupt, if !interrupted => {
                interrupted = true;
                tracing::debug!("interrupt received, closing log stream");
                handle.close();
            }
        }
    }
    match failure {
        Some(message) if !interrupted => Err(CommandError {
            message,
            exit_status: None,
        }
        .into()),
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// Apply cpu and memory limits.
///
/// # Errors
///
/// Returns a `ValidationError` before contacting the host when the limits
/// are malformed.
pub async fn update(app: &AppContext, args: UpdateArgs) -> Result<ExitCode> {
    let limits = ResourceLimits {
        cpus: args.cpus,
        memory: args.memory,
    };
    sanitize_container_id(&args.id)?;
    validate_resource_limits(&limits)?;
    let channel = app.channel()?;
    let outcome = containers::update_resources(&channel, &args.id, &limits).await?;
    app.renderer().render_update(&outcome)?;
    Ok(ExitCode::SUCCESS)
}
