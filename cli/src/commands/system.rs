//! `dockhand system` and `dockhand ping`.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::system;
use crate::output::progress;

/// Show host cores, load, memory and disk usage.
///
/// # Errors
///
/// Returns an error when the host cannot be reached.
pub async fn overview(app: &AppContext) -> Result<ExitCode> {
    let channel = app.channel()?;
    let pb = app
        .output
        .show_progress()
        .then(|| progress::spinner("Collecting host metrics..."));
    let overview = system::system_overview(&channel).await;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    app.renderer().render_overview(&overview?)?;
    Ok(ExitCode::SUCCESS)
}

/// Check that the host answers over ssh.
///
/// # Errors
///
/// Returns a `ConnectionError` when the host cannot be reached.
pub async fn ping(app: &AppContext) -> Result<ExitCode> {
    let channel = app.channel()?;
    let target = format!("{}@{}", channel.params().username, channel.params().host);
    let pb = app
        .output
        .show_progress()
        .then(|| progress::spinner(&format!("Connecting to {target}...")));
    match system::test_connection(&channel).await {
        Ok(reply) => {
            if let Some(pb) = &pb {
                progress::finish_ok(pb, &format!("{target} reachable"));
            } else if app.is_json() {
                app.renderer().render_text("reply", &reply)?;
            } else {
                app.output.success(&format!("{target} reachable"));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if let Some(pb) = &pb {
                progress::finish_error(pb, &format!("{target} unreachable"));
            }
            Err(err)
        }
    }
}
