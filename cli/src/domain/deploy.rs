//! Compose deploy pipelines and their success classification.

use crate::domain::{exec::ExecResult, validate::shell_quote};

/// Exits 0 when the compose v2 plugin is installed.
pub const COMPOSE_PROBE_COMMAND: &str = "docker compose version 2>/dev/null";

/// Output fragments compose prints when `up -d` found nothing to change.
/// Some versions exit nonzero in that case.
pub const IDEMPOTENCY_MARKERS: [&str; 3] = ["up-to-date", "Started", "Running"];

/// Which compose binary the remote host offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeInvocation {
    /// `docker compose` (v2 plugin).
    Modern,
    /// `docker-compose` (v1 standalone).
    Legacy,
}

impl ComposeInvocation {
    /// Pick the invocation from the probe's exit status.
    #[must_use]
    pub fn from_probe(probe: &ExecResult) -> Self {
        if probe.success() {
            Self::Modern
        } else {
            Self::Legacy
        }
    }

    #[must_use]
    pub fn program(self) -> &'static str {
        match self {
            Self::Modern => "docker compose",
            Self::Legacy => "docker-compose",
        }
    }
}

/// `up -d` inside the project directory.
#[must_use]
pub fn deploy_command(dir: &str, compose: ComposeInvocation) -> String {
    let c = compose.program();
    format!("cd {} && {c} up -d 2>&1", shell_quote(dir))
}

/// Pull, then recreate only if the pull succeeded.
#[must_use]
pub fn redeploy_command(dir: &str, compose: ComposeInvocation) -> String {
    let c = compose.program();
    format!(
        "cd {} && {c} pull 2>&1 && {c} up -d --force-recreate 2>&1",
        shell_quote(dir)
    )
}

/// Deploy succeeds on exit 0, or on any exit when the output shows the
/// services were already up.
#[must_use]
pub fn classify_deploy(result: &ExecResult) -> bool {
    if result.success() {
        return true;
    }
    let output = result.combined_text();
    IDEMPOTENCY_MARKERS.iter().any(|marker| output.contains(marker))
}

/// Redeploy succeeds on exit 0 only.
#[must_use]
pub fn classify_redeploy(result: &ExecResult) -> bool {
    result.success()
}
