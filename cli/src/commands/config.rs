//! `dockhand config`: show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets redacted)
    Show,
    /// Print the configuration file location
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or an override is malformed.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = app.config_store.load()?;
            let path = app.config_store.path()?;
            app.renderer().render_config(&config.ssh, &path)?;
        }
        ConfigCommand::Path => {
            let path = app.config_store.path()?;
            app.renderer()
                .render_text("path", &path.display().to_string())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
