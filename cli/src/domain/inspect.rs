//! Decoder for the JSON array printed by `docker inspect <id>`.

use dockhand_common::{ContainerInspect, EnvVar, ResourceLimits};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectDoc {
    #[serde(default)]
    config: InspectConfig,
    #[serde(default)]
    host_config: HostConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    env: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostConfig {
    #[serde(default)]
    nano_cpus: u64,
    #[serde(default)]
    memory: u64,
}

/// Result of decoding `docker inspect` output.
#[derive(Debug, PartialEq, Eq)]
pub enum InspectOutcome {
    Found(ContainerInspect),
    /// Docker returned an empty array.
    Missing,
    /// Output was not the expected JSON; an empty record is returned.
    Malformed(ContainerInspect),
}

/// Split a `KEY=VALUE` entry on its first `=`.
#[must_use]
pub fn split_env_entry(entry: &str) -> EnvVar {
    match entry.split_once('=') {
        Some((key, value)) => EnvVar::new(key, value),
        None => EnvVar::new(entry, ""),
    }
}

/// Nanocpus as a decimal cpu count, `None` when unlimited.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_cpus(nano_cpus: u64) -> Option<String> {
    (nano_cpus > 0).then(|| (nano_cpus as f64 / 1e9).to_string())
}

/// Byte count in docker's shorthand, using the largest unit that divides
/// it evenly (`536870912` ⇒ `512m`). `None` when unlimited.
#[must_use]
pub fn format_memory(bytes: u64) -> Option<String> {
    if bytes == 0 {
        return None;
    }
    let shorthand = [("g", 1u64 << 30), ("m", 1 << 20), ("k", 1 << 10)]
        .into_iter()
        .find(|(_, size)| bytes % size == 0)
        .map_or_else(|| bytes.to_string(), |(unit, size)| format!("{}{unit}", bytes / size));
    Some(shorthand)
}

/// Decode inspect output for a single container.
#[must_use]
pub fn parse_inspect(text: &str) -> InspectOutcome {
    let docs: Vec<InspectDoc> = match serde_json::from_str(text.trim()) {
        Ok(docs) => docs,
        Err(err) => {
            tracing::warn!(%err, "unexpected docker inspect output");
            return InspectOutcome::Malformed(ContainerInspect::default());
        }
    };
    let Some(doc) = docs.into_iter().next() else {
        return InspectOutcome::Missing;
    };
    let env = doc
        .config
        .env
        .unwrap_or_default()
        .iter()
        .map(|entry| split_env_entry(entry))
        .collect();
    InspectOutcome::Found(ContainerInspect {
        env,
        limits: ResourceLimits {
            cpus: format_cpus(doc.host_config.nano_cpus),
            memory: format_memory(doc.host_config.memory),
        },
    })
}
