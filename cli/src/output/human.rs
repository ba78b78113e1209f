//! Human-readable terminal renderer.

use std::path::Path;

use dockhand_common::{
    ActionOutcome, ComposeFile, ContainerInspect, ContainerRecord, ContainerStats,
    DeployResult, EnvVar, Project, ProjectListing, ProjectWithContainers, SystemOverview,
};
use owo_colors::OwoColorize as _;

use crate::application::services::containers::ResourceUpdateOutcome;
use crate::domain::config::SshSettings;
use crate::output::OutputContext;

/// Width docker itself uses for short container ids.
const SHORT_ID_LEN: usize = 12;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("dockhand {version}");
    }

    /// Render the container inventory as a table.
    pub fn render_containers(&self, containers: &[ContainerRecord]) {
        if containers.is_empty() {
            self.ctx.info("No containers on the host.");
            return;
        }
        println!(
            "{}",
            format!(
                "{:<12}  {:<24}  {:<28}  {:<10}  {:<20}  {}",
                "ID", "NAME", "IMAGE", "STATE", "STATUS", "PROJECT"
            )
            .style(self.ctx.styles.bold)
        );
        for c in containers {
            let state = format!("{:<10}", c.state);
            println!(
                "{:<12}  {:<24}  {:<28}  {}  {:<20}  {}",
                short_id(&c.id),
                c.name,
                c.image,
                state.style(self.ctx.styles.for_state(&c.state)),
                c.status,
                c.compose_project.as_deref().unwrap_or("-"),
            );
        }
    }

    /// Render resource usage samples.
    pub fn render_stats(&self, stats: &[ContainerStats]) {
        if stats.is_empty() {
            self.ctx.info("No stats available.");
            return;
        }
        println!(
            "{}",
            format!(
                "{:<12}  {:<24}  {:>7}  {:>21}  {:>7}",
                "ID", "NAME", "CPU %", "MEM USAGE / LIMIT", "MEM %"
            )
            .style(self.ctx.styles.bold)
        );
        for s in stats {
            let usage = format!(
                "{} / {}",
                s.mem_usage_bytes.map_or_else(|| "-".to_string(), format_bytes),
                s.mem_limit_bytes.map_or_else(|| "-".to_string(), format_bytes),
            );
            println!(
                "{:<12}  {:<24}  {:>7}  {:>21}  {:>7}",
                short_id(&s.id),
                s.name,
                format_percent(s.cpu_percent),
                usage,
                format_percent(s.mem_percent),
            );
        }
    }

    /// Render environment and limits of one container.
    pub fn render_inspect(&self, inspect: &ContainerInspect) {
        self.ctx.header("Limits:");
        self.ctx.kv(
            "cpus:  ",
            inspect.limits.cpus.as_deref().unwrap_or("unlimited"),
        );
        self.ctx.kv(
            "memory:",
            inspect.limits.memory.as_deref().unwrap_or("unlimited"),
        );
        println!();
        self.ctx.header("Environment:");
        self.render_env(&inspect.env);
    }

    /// Render a list of environment variables as `KEY=VALUE` lines.
    pub fn render_env(&self, vars: &[EnvVar]) {
        if vars.is_empty() {
            self.ctx.info("No variables.");
            return;
        }
        for var in vars {
            println!("  {}={}", var.key.style(self.ctx.styles.bold), var.value);
        }
    }

    /// Render the outcome of `docker update`.
    pub fn render_update(&self, outcome: &ResourceUpdateOutcome) {
        self.ctx.success(&format!("Applied: {}", outcome.command));
    }

    /// Render manual and compose projects with their members.
    pub fn render_projects(&self, listing: &ProjectListing) {
        if listing.manual_projects.is_empty() && listing.auto_projects.is_empty() {
            self.ctx.info("No projects.");
            return;
        }
        if !listing.manual_projects.is_empty() {
            self.ctx.header("Manual projects:");
            for project in &listing.manual_projects {
                self.render_project_entry(project);
            }
            println!();
        }
        if !listing.auto_projects.is_empty() {
            self.ctx.header("Compose projects:");
            for project in &listing.auto_projects {
                self.render_project_entry(project);
            }
        }
    }

    fn render_project_entry(&self, entry: &ProjectWithContainers) {
        let running = entry.containers.iter().filter(|c| c.is_running()).count();
        println!(
            "  {:<32} {}  {}",
            entry.project.name.style(self.ctx.styles.bold),
            format!("({})", entry.project.id).style(self.ctx.styles.dim),
            format!("{running}/{} running", entry.containers.len()),
        );
        for c in &entry.containers {
            println!(
                "      {} {} {}",
                "•".style(self.ctx.styles.for_state(&c.state)),
                c.name,
                format!("[{}]", short_id(&c.id)).style(self.ctx.styles.dim),
            );
        }
    }

    /// Render a freshly created or renamed project.
    pub fn render_project(&self, project: &Project) {
        self.ctx
            .success(&format!("{} ({})", project.name, project.id));
    }

    /// Render per-container outcomes of a project-wide action.
    pub fn render_outcomes(&self, outcomes: &[ActionOutcome]) {
        if outcomes.is_empty() {
            self.ctx.info("Project has no containers on the host.");
            return;
        }
        for outcome in outcomes {
            if outcome.ok {
                println!("  {} {}", "✓".style(self.ctx.styles.success), outcome.message);
            } else {
                println!(
                    "  {} {}: {}",
                    "✗".style(self.ctx.styles.error),
                    short_id(&outcome.id),
                    outcome.message
                );
            }
        }
    }

    /// Render files discovered for a compose project.
    pub fn render_files(&self, files: &[ComposeFile]) {
        if files.is_empty() {
            self.ctx.info("No compose or env files found.");
            return;
        }
        for file in files {
            let kind = match file.kind {
                dockhand_common::FileKind::Compose => "compose",
                dockhand_common::FileKind::Env => "env",
                dockhand_common::FileKind::Other => "other",
            };
            println!(
                "  {:<8} {:<24} {}",
                kind.style(self.ctx.styles.info),
                file.name,
                file.path.style(self.ctx.styles.dim)
            );
        }
    }

    /// Render a deploy transcript followed by its verdict.
    pub fn render_deploy(&self, result: &DeployResult) {
        let output = result.output.trim_end();
        if !output.is_empty() {
            println!("{output}");
        }
        if result.success {
            self.ctx.success("Deploy succeeded");
        } else {
            self.ctx.error("Deploy failed");
        }
    }

    /// Render host cores, load, memory and disks.
    pub fn render_overview(&self, overview: &SystemOverview) {
        let load: Vec<String> = overview.load.iter().map(|l| format!("{l:.2}")).collect();
        self.ctx.kv("Cores: ", &overview.cores.to_string());
        self.ctx.kv("Load:  ", &load.join(" "));
        let mem = &overview.memory;
        self.ctx.kv(
            "Memory:",
            &format!(
                "{} MiB / {} MiB ({}%)",
                mem.used_mb, mem.total_mb, mem.used_percent
            ),
        );
        if overview.disk.is_empty() {
            return;
        }
        println!();
        self.ctx.header("Disks:");
        for disk in &overview.disk {
            println!(
                "  {:<20} {:>10} / {:>10} {:>4}%  {}",
                disk.fs,
                format_bytes(disk.used_bytes),
                format_bytes(disk.size_bytes),
                disk.used_percent,
                disk.target.style(self.ctx.styles.dim),
            );
        }
    }

    /// Render the effective configuration. Secrets must already be redacted.
    pub fn render_config(&self, ssh: &SshSettings, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let show = |v: Option<&str>| v.unwrap_or("(not set)").to_string();
        println!("  {:<26} {}", "ssh.host:", show(ssh.host.as_deref()));
        println!("  {:<26} {}", "ssh.port:", ssh.port);
        println!("  {:<26} {}", "ssh.username:", show(ssh.username.as_deref()));
        println!("  {:<26} {}", "ssh.private_key:", show(ssh.private_key.as_deref()));
        println!(
            "  {:<26} {}",
            "ssh.private_key_path:",
            ssh.private_key_path
                .as_ref()
                .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
        );
        println!(
            "  {:<26} {}",
            "ssh.private_key_passphrase:",
            show(ssh.private_key_passphrase.as_deref())
        );
        println!("  {:<26} {}", "ssh.password:", show(ssh.password.as_deref()));
        println!("  {:<26} {}", "ssh.connect_timeout_ms:", ssh.connect_timeout_ms);
        println!(
            "  {:<26} {}",
            "ssh.known_hosts:",
            ssh.known_hosts
                .as_ref()
                .map_or_else(|| "(ssh default)".to_string(), |p| p.display().to_string())
        );
        println!();
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

/// First twelve characters of a container id, the way `docker ps` shows it.
#[must_use]
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Binary-unit size with one decimal, e.g. `1.5GiB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// Percentage with two decimals, or `-` when unknown.
#[must_use]
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}%"))
}
