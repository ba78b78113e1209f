use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label set by docker compose on every container it creates.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Label holding the directory `docker compose` was run from.
pub const COMPOSE_WORKING_DIR_LABEL: &str = "com.docker.compose.project.working_dir";

/// One row of `docker ps -a`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Lifecycle state as reported by docker (`running`, `exited`, ...).
    pub state: String,
    /// Human status string, e.g. `Up 3 hours`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Value of the compose project label; `None` for standalone containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_project: Option<String>,
}

impl ContainerRecord {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Point-in-time resource usage of one container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStats {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_usage_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_percent: Option<f64>,
}

/// A single `KEY=VALUE` entry. Order and duplicates are preserved by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// CPU and memory ceilings, expressed the way `docker update` accepts them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResourceLimits {
    /// Decimal CPU count, e.g. `"1.5"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<String>,
    /// Docker size shorthand, e.g. `"512m"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl ResourceLimits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cpus.is_none() && self.memory.is_none()
    }
}

/// Environment and limits pulled from `docker inspect`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ContainerInspect {
    pub env: Vec<EnvVar>,
    pub limits: ResourceLimits,
}

/// Role of a file inside a compose project directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Env,
    Compose,
    Other,
}

/// A file discovered for a compose project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComposeFile {
    /// Name as written by the operator (file name or `env_file` entry).
    pub name: String,
    /// Absolute path on the remote host.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

/// Outcome of `compose up` / `pull && up --force-recreate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployResult {
    pub output: String,
    pub success: bool,
}

/// Per-container outcome of a project-wide lifecycle action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionOutcome {
    pub id: String,
    pub ok: bool,
    pub message: String,
}

/// Host memory summary in MiB, as printed by `free -m`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemoryOverview {
    pub total_mb: u64,
    pub used_mb: u64,
    pub free_mb: u64,
    pub used_percent: u64,
}

/// One mounted filesystem from `df -B1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiskOverview {
    pub fs: String,
    pub size_bytes: u64,
    pub used_bytes: u64,
    pub avail_bytes: u64,
    pub used_percent: u64,
    pub target: String,
}

/// Host-level resource snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SystemOverview {
    pub cores: u32,
    pub load: Vec<f64>,
    pub memory: MemoryOverview,
    pub disk: Vec<DiskOverview>,
}
