//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use dockhand_common::{
    ActionOutcome, ComposeFile, ContainerInspect, ContainerRecord, ContainerStats,
    DeployResult, EnvVar, Project, ProjectListing, SystemOverview,
};
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::containers::ResourceUpdateOutcome;
use crate::domain::config::SshSettings;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Mode-specific renderer handed out by `AppContext::renderer`.
///
/// Every method prints one result; in JSON mode that is exactly one document.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render(&serde_json::json!({ "version": version })),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_containers(&self, containers: &[ContainerRecord]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_containers(containers);
                Ok(())
            }
            Self::Json(r) => r.render(containers),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_stats(&self, stats: &[ContainerStats]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_stats(stats);
                Ok(())
            }
            Self::Json(r) => r.render(stats),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_inspect(&self, inspect: &ContainerInspect) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_inspect(inspect);
                Ok(())
            }
            Self::Json(r) => r.render(inspect),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_env(&self, path: &str, vars: &[EnvVar]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_env(vars);
                Ok(())
            }
            Self::Json(r) => r.render(&serde_json::json!({ "path": path, "vars": vars })),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_update(&self, outcome: &ResourceUpdateOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_update(outcome);
                Ok(())
            }
            Self::Json(r) => r.render(outcome),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_projects(&self, listing: &ProjectListing) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_projects(listing);
                Ok(())
            }
            Self::Json(r) => r.render(listing),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_project(&self, project: &Project) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_project(project);
                Ok(())
            }
            Self::Json(r) => r.render(project),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_outcomes(&self, outcomes: &[ActionOutcome]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_outcomes(outcomes);
                Ok(())
            }
            Self::Json(r) => r.render(outcomes),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_files(&self, files: &[ComposeFile]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_files(files);
                Ok(())
            }
            Self::Json(r) => r.render(files),
        }
    }

    /// Raw text such as logs or file content: verbatim for humans, wrapped
    /// in `{ key: text }` for JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_text(&self, key: &str, text: &str) -> Result<()> {
        match self {
            Self::Human(_) => {
                print!("{text}");
                if !text.is_empty() && !text.ends_with('\n') {
                    println!();
                }
                Ok(())
            }
            Self::Json(r) => {
                let mut obj = serde_json::Map::new();
                obj.insert(key.to_string(), serde_json::Value::from(text));
                r.render(&obj)
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deploy(&self, result: &DeployResult) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_deploy(result);
                Ok(())
            }
            Self::Json(r) => r.render(result),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_overview(&self, overview: &SystemOverview) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_overview(overview);
                Ok(())
            }
            Self::Json(r) => r.render(overview),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, ssh: &SshSettings, path: &Path) -> Result<()> {
        let ssh = ssh.redacted();
        match self {
            Self::Human(r) => {
                r.render_config(&ssh, path);
                Ok(())
            }
            Self::Json(r) => r.render(&serde_json::json!({
                "path": path.display().to_string(),
                "ssh": ssh,
            })),
        }
    }
}
