//! Decoder for `docker ps -a --format '{{json .}}'`.

use std::collections::{BTreeMap, HashSet};

use dockhand_common::{COMPOSE_PROJECT_LABEL, ContainerRecord};
use serde::Deserialize;

use crate::domain::lines::{LineError, decode_lines};

/// Remote command producing one JSON object per container.
pub const INVENTORY_COMMAND: &str = "docker ps -a --no-trunc --format '{{json .}}'";

/// Raw shape of one `docker ps` row.
#[derive(Debug, Deserialize)]
struct PsRow {
    #[serde(rename = "ID")]
    id: Option<String>,
    #[serde(rename = "Names", default)]
    names: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "CreatedAt")]
    created_at: Option<String>,
    #[serde(rename = "Ports", default)]
    ports: String,
    #[serde(rename = "Labels", default)]
    labels: String,
}

/// Split docker's `k=v,k2=v2` label string. Values keep any further `=`.
#[must_use]
pub fn parse_labels(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.to_string()),
            None => (pair.trim().to_string(), String::new()),
        })
        .collect()
}

/// Decode one inventory line.
///
/// # Errors
///
/// Returns [`LineError`] if the line is not a JSON object with an `ID`.
pub fn decode_inventory_line(line: &str) -> Result<ContainerRecord, LineError> {
    let row: PsRow = serde_json::from_str(line)?;
    let id = row
        .id
        .filter(|id| !id.is_empty())
        .ok_or(LineError::MissingField("ID"))?;
    let labels = parse_labels(&row.labels);
    let compose_project = labels
        .get(COMPOSE_PROJECT_LABEL)
        .filter(|v| !v.is_empty())
        .cloned();
    Ok(ContainerRecord {
        id,
        name: row.names,
        image: row.image,
        state: row.state,
        status: row.status,
        created_at: row.created_at.filter(|s| !s.is_empty()),
        ports: Some(row.ports).filter(|p| !p.is_empty()),
        labels,
        compose_project,
    })
}

/// Parse a full inventory. Undecodable lines are dropped and the first
/// record wins when an id repeats.
#[must_use]
pub fn parse_inventory(text: &str) -> Vec<ContainerRecord> {
    let mut seen = HashSet::new();
    decode_lines(text, "inventory", decode_inventory_line)
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
