//! Application service: compose project discovery and file access.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! Each existence probe is its own remote round-trip.

use std::collections::HashSet;

use anyhow::Result;
use dockhand_common::{ComposeFile, FileKind};

use crate::application::ports::RemoteExecutor;
use crate::domain::compose::{
    COMPOSE_FILE_NAMES, ROOT_ENV_FILES, probe_file_command, project_container_command,
    read_file_command, resolve_ref, scan_env_file_refs, working_dir_command, write_file_command,
};
use crate::domain::validate::{sanitize_container_id, sanitize_project_name, validate_path};

/// Go templates print this for a missing map key on some docker versions.
const NO_VALUE: &str = "<no value>";

/// Working directory of the compose project `name`, or `None` when no
/// container carries the label or the directory was not recorded.
///
/// # Errors
///
/// Returns a `ValidationError` for a malformed name and propagates
/// connection errors.
pub async fn find_compose_project_path(
    exec: &impl RemoteExecutor,
    name: &str,
) -> Result<Option<String>> {
    let name = sanitize_project_name(name)?;
    let found = exec.execute(&project_container_command(name)).await?;
    let container_id = found.stdout_text().trim().to_string();
    if container_id.is_empty() {
        tracing::debug!(project = name, "no container carries the project label");
        return Ok(None);
    }
    let container_id = sanitize_container_id(&container_id)?;
    let dir = exec
        .execute(&working_dir_command(container_id))
        .await?
        .stdout_text()
        .trim()
        .to_string();
    if dir.is_empty() || dir == NO_VALUE {
        return Ok(None);
    }
    Ok(Some(dir))
}

async fn file_exists(exec: &impl RemoteExecutor, path: &str) -> Result<bool> {
    Ok(exec.execute(&probe_file_command(path)).await?.success())
}

/// Compose document, the env files it references, and conventional
/// dotenv files at the project root, in that order. No path appears twice.
///
/// # Errors
///
/// Returns a `ValidationError` if `dir` is not a safe absolute path and
/// propagates connection errors.
pub async fn list_project_files(exec: &impl RemoteExecutor, dir: &str) -> Result<Vec<ComposeFile>> {
    validate_path(dir)?;
    let dir = dir.trim_end_matches('/');
    let mut files = Vec::new();
    let mut probed: HashSet<String> = HashSet::new();

    let mut compose_path = None;
    for name in COMPOSE_FILE_NAMES {
        let path = format!("{dir}/{name}");
        probed.insert(path.clone());
        if file_exists(exec, &path).await? {
            files.push(ComposeFile {
                name: name.to_string(),
                path: path.clone(),
                kind: FileKind::Compose,
            });
            compose_path = Some(path);
            break;
        }
    }

    if let Some(compose_path) = compose_path {
        let document = exec.execute(&read_file_command(&compose_path)).await?;
        if document.success() {
            for reference in scan_env_file_refs(&document.stdout_text()) {
                let path = resolve_ref(dir, &reference);
                if !probed.insert(path.clone()) {
                    continue;
                }
                if file_exists(exec, &path).await? {
                    files.push(ComposeFile {
                        name: reference,
                        path,
                        kind: FileKind::Env,
                    });
                }
            }
        } else {
            tracing::warn!(path = %compose_path, "compose file exists but could not be read");
        }
    }

    for name in ROOT_ENV_FILES {
        let path = format!("{dir}/{name}");
        if !probed.insert(path.clone()) {
            continue;
        }
        if file_exists(exec, &path).await? {
            files.push(ComposeFile {
                name: name.to_string(),
                path,
                kind: FileKind::Env,
            });
        }
    }
    Ok(files)
}

/// Contents of a remote file.
///
/// # Errors
///
/// Returns a `ValidationError` for an unsafe path before any remote call,
/// and a `CommandError` when the file cannot be read.
pub async fn read_project_file(exec: &impl RemoteExecutor, path: &str) -> Result<String> {
    validate_path(path)?;
    let result = exec
        .execute(&read_file_command(path))
        .await?
        .ensure_exit_zero("Failed to read file")?;
    Ok(result.stdout_text())
}

/// Replace a remote file's contents.
///
/// # Errors
///
/// Returns a `ValidationError` for an unsafe path before any remote call,
/// and a `CommandError` when the write fails.
pub async fn write_project_file(exec: &impl RemoteExecutor, path: &str, content: &str) -> Result<()> {
    validate_path(path)?;
    let stamp = chrono::Utc::now().timestamp_millis();
    tracing::info!(path, bytes = content.len(), "writing remote file");
    exec.execute(&write_file_command(path, content, stamp))
        .await?
        .ensure_exit_zero("Failed to write file")?;
    Ok(())
}
