//! dockhand: remote docker control over SSH

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dockhand_cli::app::AppContext;
use dockhand_cli::cli::Cli;
use dockhand_cli::output::json::{error_code, format_error};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let app = AppContext::new(&cli.app_flags());
    match cli.run(&app).await {
        Ok(code) => code,
        Err(e) => {
            if app.is_json() {
                match format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
