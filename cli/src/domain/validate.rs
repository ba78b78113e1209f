//! Local input validation. Runs before any command reaches the remote host.
//!
//! Pure functions only. Every identifier or path that is interpolated into a
//! remote shell command passes through one of these first.

use std::sync::LazyLock;

use anyhow::Result;
use dockhand_common::ResourceLimits;
use regex::Regex;

use crate::domain::error::ValidationError;

/// Container ids are hex; names add letters, digits, `_`, `.` and `-`.
pub static CONTAINER_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("valid regex")
});

/// Same grammar `docker update --memory` accepts.
pub static MEMORY_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^\d+[kmgKMG]?$").expect("valid regex")
});

/// Upper bound accepted for `--cpus`.
pub const MAX_CPUS: f64 = 128.0;

/// Default and maximum number of log lines for a bounded tail.
pub const DEFAULT_TAIL_LINES: u32 = 200;
pub const MAX_TAIL_LINES: u32 = 10_000;

/// Accept an absolute path with no `..` segments and no repeated slashes.
///
/// # Errors
///
/// Returns [`ValidationError::UnsafePath`] otherwise.
pub fn validate_path(path: &str) -> Result<()> {
    if path.contains("..") || path.contains("//") || !path.starts_with('/') {
        return Err(ValidationError::UnsafePath(path.to_string()).into());
    }
    Ok(())
}

/// Accept a container id or name that is safe to embed in shell text.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidContainerId`] otherwise.
pub fn sanitize_container_id(id: &str) -> Result<&str> {
    if !CONTAINER_ID_RE.is_match(id) {
        return Err(ValidationError::InvalidContainerId(id.to_string()).into());
    }
    Ok(id)
}

/// Compose project names follow the container-name grammar.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidProjectName`] otherwise.
pub fn sanitize_project_name(name: &str) -> Result<&str> {
    if !CONTAINER_ID_RE.is_match(name) {
        return Err(ValidationError::InvalidProjectName(name.to_string()).into());
    }
    Ok(name)
}

/// A validated `docker update` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUpdate {
    pub cpus: Option<String>,
    pub memory: Option<String>,
}

impl ResourceUpdate {
    /// `--cpus=..` / `--memory=..` flags in a stable order.
    #[must_use]
    pub fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(cpus) = &self.cpus {
            flags.push(format!("--cpus={cpus}"));
        }
        if let Some(memory) = &self.memory {
            flags.push(format!("--memory={memory}"));
        }
        flags
    }
}

/// Validate a cpu/memory pair before issuing `docker update`.
///
/// Empty strings count as omitted. The cpu value is re-rendered from the
/// parsed number so nothing but digits and a dot reaches the shell.
///
/// # Errors
///
/// - [`ValidationError::NoLimits`] when both are omitted.
/// - [`ValidationError::InvalidCpuLimit`] unless `0 < cpus <= 128`.
/// - [`ValidationError::InvalidMemoryLimit`] unless memory matches `\d+[kmg]?`.
pub fn validate_resource_limits(limits: &ResourceLimits) -> Result<ResourceUpdate> {
    let cpus = limits.cpus.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let memory = limits.memory.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if cpus.is_none() && memory.is_none() {
        return Err(ValidationError::NoLimits.into());
    }

    let cpus = cpus
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n > 0.0 && *n <= MAX_CPUS)
                .map(|n| n.to_string())
                .ok_or_else(|| ValidationError::InvalidCpuLimit(raw.to_string()))
        })
        .transpose()?;

    let memory = memory
        .map(|raw| {
            if MEMORY_LIMIT_RE.is_match(raw) {
                Ok(raw.to_string())
            } else {
                Err(ValidationError::InvalidMemoryLimit(raw.to_string()))
            }
        })
        .transpose()?;

    Ok(ResourceUpdate { cpus, memory })
}

/// Clamp a requested tail length into `1..=MAX_TAIL_LINES`.
#[must_use]
pub fn clamp_tail_lines(lines: Option<u32>) -> u32 {
    lines
        .unwrap_or(DEFAULT_TAIL_LINES)
        .clamp(1, MAX_TAIL_LINES)
}

/// Quote `value` as a single POSIX shell word.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
