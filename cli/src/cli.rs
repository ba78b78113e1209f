//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::application::services::containers::ContainerAction;
use crate::commands;

/// Operate docker containers and compose projects on a remote host over SSH
#[derive(Parser)]
#[command(
    name = "dockhand",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// `NO_COLOR` disables colors when set to any value other than a falsey
    /// one (`0`, `false`, `no`, `off`).
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log every remote command to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List containers
    Ps,

    /// Show cpu and memory usage
    Stats(commands::containers::StatsArgs),

    /// Show environment and resource limits of a container
    Inspect {
        /// Container id or name
        id: String,
    },

    /// Start a container
    Start {
        /// Container id or name
        id: String,
    },

    /// Stop a container
    Stop {
        /// Container id or name
        id: String,
    },

    /// Restart a container
    Restart {
        /// Container id or name
        id: String,
    },

    /// Show container logs
    Logs(commands::containers::LogsArgs),

    /// Change cpu and memory limits of a container
    Update(commands::containers::UpdateArgs),

    /// Manage projects
    #[command(subcommand)]
    Projects(commands::projects::ProjectsCommand),

    /// Inspect and edit compose project files
    #[command(subcommand)]
    Files(commands::files::FilesCommand),

    /// Run `compose up -d` for a project
    Deploy {
        /// Compose project name
        project: String,
    },

    /// Pull images and force-recreate a project
    Redeploy {
        /// Compose project name
        project: String,
    },

    /// Show host cores, load, memory and disks
    System,

    /// Test the ssh connection
    Ping,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Flags for `AppContext::new`.
    #[must_use]
    pub fn app_flags(&self) -> AppFlags {
        AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, app: &AppContext) -> Result<ExitCode> {
        match self.command {
            Command::Ps => commands::containers::ps(app).await,
            Command::Stats(args) => commands::containers::stats(app, &args).await,
            Command::Inspect { id } => commands::containers::inspect(app, &id).await,
            Command::Start { id } => {
                commands::containers::lifecycle(app, ContainerAction::Start, &id).await
            }
            Command::Stop { id } => {
                commands::containers::lifecycle(app, ContainerAction::Stop, &id).await
            }
            Command::Restart { id } => {
                commands::containers::lifecycle(app, ContainerAction::Restart, &id).await
            }
            Command::Logs(args) => commands::containers::logs(app, &args).await,
            Command::Update(args) => commands::containers::update(app, args).await,
            Command::Projects(cmd) => commands::projects::run(app, cmd).await,
            Command::Files(cmd) => commands::files::run(app, cmd).await,
            Command::Deploy { project } => commands::deploy::deploy(app, &project).await,
            Command::Redeploy { project } => commands::deploy::redeploy(app, &project).await,
            Command::System => commands::system::overview(app).await,
            Command::Ping => commands::system::ping(app).await,
            Command::Config(cmd) => commands::config::run(app, &cmd),
            Command::Version => commands::version::run(app),
        }
    }
}
