use serde::{Deserialize, Serialize};

use crate::types::ContainerRecord;

/// Where a project grouping came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSource {
    /// Derived from the compose project label on every listing.
    Auto,
    /// Defined by the operator and persisted by a project store.
    Manual,
}

/// A named group of containers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub container_ids: Vec<String>,
    pub source: ProjectSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_project: Option<String>,
}

/// A project together with the member containers present in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectWithContainers {
    pub project: Project,
    pub containers: Vec<ContainerRecord>,
}

/// Every project visible to the operator, manual groupings first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListing {
    pub manual_projects: Vec<ProjectWithContainers>,
    pub auto_projects: Vec<ProjectWithContainers>,
}
