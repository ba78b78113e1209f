//! Project grouping over a container inventory.

use dockhand_common::{ContainerRecord, Project, ProjectSource, ProjectWithContainers};

/// Prefix of ids derived from the compose label.
pub const AUTO_PREFIX: &str = "auto:";

/// Id of the group holding containers without a compose label. Carries no
/// `auto:` prefix so a compose project named `standalone` keeps its own id.
pub const STANDALONE_PROJECT_ID: &str = "standalone";

/// Group containers by compose label, in order of first appearance.
/// Unlabelled containers form one trailing standalone group.
#[must_use]
pub fn group_auto_projects(containers: &[ContainerRecord]) -> Vec<ProjectWithContainers> {
    let mut groups: Vec<(String, Vec<ContainerRecord>)> = Vec::new();
    let mut standalone = Vec::new();
    for container in containers {
        let Some(label) = container.compose_project.as_deref() else {
            standalone.push(container.clone());
            continue;
        };
        match groups.iter_mut().find(|(name, _)| name == label) {
            Some((_, members)) => members.push(container.clone()),
            None => groups.push((label.to_string(), vec![container.clone()])),
        }
    }

    let mut projects: Vec<ProjectWithContainers> = groups
        .into_iter()
        .map(|(name, members)| ProjectWithContainers {
            project: Project {
                id: format!("{AUTO_PREFIX}{name}"),
                name: name.clone(),
                container_ids: members.iter().map(|c| c.id.clone()).collect(),
                source: ProjectSource::Auto,
                compose_project: Some(name),
            },
            containers: members,
        })
        .collect();

    if !standalone.is_empty() {
        projects.push(ProjectWithContainers {
            project: Project {
                id: STANDALONE_PROJECT_ID.to_string(),
                name: "Standalone Containers".to_string(),
                container_ids: standalone.iter().map(|c| c.id.clone()).collect(),
                source: ProjectSource::Auto,
                compose_project: None,
            },
            containers: standalone,
        });
    }
    projects
}

/// Pair each project with the inventory records of its members. Ids no
/// longer present in the inventory are skipped.
#[must_use]
pub fn attach_containers(
    projects: Vec<Project>,
    containers: &[ContainerRecord],
) -> Vec<ProjectWithContainers> {
    projects
        .into_iter()
        .map(|project| {
            let members = containers
                .iter()
                .filter(|c| project.container_ids.contains(&c.id))
                .cloned()
                .collect();
            ProjectWithContainers {
                project,
                containers: members,
            }
        })
        .collect()
}

/// Generates a unique manual project id: `manual-` followed by 16 hex chars.
#[must_use]
pub fn generate_project_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    format!("manual-{:016x}", hasher.finish())
}
