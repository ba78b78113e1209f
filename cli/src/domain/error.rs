//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Connection errors ─────────────────────────────────────────────────────────

/// The remote host could not be reached, authenticated against, or answered
/// too slowly. Always terminates the call.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("SSH command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("SSH connection failed: {0}")]
    Transport(String),

    #[error("failed to launch ssh client: {0}")]
    Spawn(String),
}

// ── Command errors ────────────────────────────────────────────────────────────

/// A remote command ran but reported failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
    pub exit_status: Option<i32>,
}

// ── Validation errors ─────────────────────────────────────────────────────────

/// Local precondition failures, raised before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file path: {0}")]
    UnsafePath(String),

    #[error("Invalid container ID: {0}")]
    InvalidContainerId(String),

    #[error("Invalid project name: {0}")]
    InvalidProjectName(String),

    #[error("Invalid CPU limit '{0}': expected a positive number no greater than 128")]
    InvalidCpuLimit(String),

    #[error("Invalid memory limit '{0}': expected digits with an optional k, m or g suffix")]
    InvalidMemoryLimit(String),

    #[error("No resource limits provided: pass --cpus and/or --memory")]
    NoLimits,

    #[error("Invalid environment assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),
}

// ── Not-found errors ──────────────────────────────────────────────────────────

/// A well-formed request that references something that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("Project '{0}' not found.")]
    Project(String),

    #[error("No compose working directory recorded for project '{0}'.")]
    WorkingDirectory(String),

    #[error("Container '{0}' not found.")]
    Container(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to connection configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0}. Set it in the config file or via VPS_* environment variables.")]
    Missing(&'static str),

    #[error("No SSH credential configured: set a private key, key path, or password.")]
    NoCredential,

    #[error("Private key is not valid base64: {0}")]
    InvalidKeyEncoding(String),

    #[error("Connect timeout must be greater than zero.")]
    ZeroTimeout,

    #[error("Invalid host '{0}'.")]
    InvalidHost(String),
}
