//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the stream primitives,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;
use dockhand_common::Project;

use crate::application::stream::StreamHandle;
use crate::domain::{DockhandConfig, ExecResult};

// ── Remote execution ──────────────────────────────────────────────────────────

/// Runs shell commands on the docker host.
///
/// Every call is independent: implementations open a fresh connection per
/// call and release it when the call ends.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Run `command` to completion and return everything it printed.
    ///
    /// The exit status is not interpreted here.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`](crate::domain::ConnectionError) when the
    /// host cannot be reached or the deadline expires.
    async fn execute(&self, command: &str) -> Result<ExecResult>;

    /// Start `command` and deliver its output incrementally.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`](crate::domain::ConnectionError) when the
    /// client cannot be started.
    async fn stream(&self, command: &str) -> Result<StreamHandle>;
}

// ── Project persistence ───────────────────────────────────────────────────────

/// Partial update applied by [`ProjectStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub container_ids: Option<Vec<String>>,
}

/// Storage for operator-defined projects.
#[allow(async_fn_in_trait)]
pub trait ProjectStore {
    /// All stored projects, in creation order.
    async fn list(&self) -> Result<Vec<Project>>;
    /// Persist a new manual project and return it with its generated id.
    async fn create(&self, name: &str, container_ids: Vec<String>) -> Result<Project>;
    /// Apply `update` to the project with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Project`](crate::domain::NotFoundError) for an unknown id.
    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Project>;
    /// Delete the project with `id`. Returns whether it existed.
    async fn remove(&self, id: &str) -> Result<bool>;
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Abstracts loading the dockhand configuration.
pub trait ConfigStore {
    /// Load the file configuration with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// an environment override has the wrong type.
    fn load(&self) -> Result<DockhandConfig>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Progress events emitted by multi-step services.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
