//! Infrastructure implementation of the `ProjectStore` port.
//!
//! `JsonProjectStore` keeps manual projects in one JSON array. Reads and
//! writes run in `tokio::task::spawn_blocking`; writes are atomic (temp file
//! + rename). Concurrent writers are not coordinated: the last write wins.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dockhand_common::{Project, ProjectSource};

use crate::application::ports::{ProjectStore, ProjectUpdate};
use crate::domain::error::NotFoundError;
use crate::domain::project::generate_project_id;

/// Overrides the store location.
pub const PROJECTS_PATH_ENV: &str = "DOCKHAND_PROJECTS";

/// Project file manager: implements `ProjectStore` for the infra layer.
pub struct JsonProjectStore {
    path: PathBuf,
}

impl JsonProjectStore {
    /// Store at `$DOCKHAND_PROJECTS`, else `~/.dockhand/projects.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Some(path) = std::env::var_os(PROJECTS_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::with_path(PathBuf::from(path)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".dockhand").join("projects.json")))
    }

    /// Create a store with an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_sync(&self) -> Result<Vec<Project>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading project file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parsing project file {}", self.path.display()))
    }

    fn save_sync(&self, projects: &[Project]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(projects).context("serializing projects")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing project file {}", self.path.display()))?;
        Ok(())
    }

    /// Load, apply `edit`, save. Runs on the blocking pool.
    async fn modify<T: Send + 'static>(
        &self,
        edit: impl FnOnce(&mut Vec<Project>) -> Result<T> + Send + 'static,
    ) -> Result<T> {
        let store = Self::with_path(self.path.clone());
        tokio::task::spawn_blocking(move || {
            let mut projects = store.load_sync()?;
            let out = edit(&mut projects)?;
            store.save_sync(&projects)?;
            Ok(out)
        })
        .await
        .context("project store task panicked")?
    }
}

impl ProjectStore for JsonProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let store = Self::with_path(self.path.clone());
        tokio::task::spawn_blocking(move || store.load_sync())
            .await
            .context("project load task panicked")?
    }

    async fn create(&self, name: &str, container_ids: Vec<String>) -> Result<Project> {
        let project = Project {
            id: generate_project_id(),
            name: name.to_string(),
            container_ids,
            source: ProjectSource::Manual,
            compose_project: None,
        };
        tracing::info!(id = %project.id, name, "creating project");
        let created = project.clone();
        self.modify(move |projects| {
            projects.push(project);
            Ok(())
        })
        .await?;
        Ok(created)
    }

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Project> {
        let id = id.to_string();
        self.modify(move |projects| {
            let project = projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| NotFoundError::Project(id.clone()))?;
            if let Some(name) = update.name {
                project.name = name;
            }
            if let Some(ids) = update.container_ids {
                project.container_ids = ids;
            }
            Ok(project.clone())
        })
        .await
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.modify(move |projects| {
            let before = projects.len();
            projects.retain(|p| p.id != id);
            Ok(projects.len() != before)
        })
        .await
    }
}
