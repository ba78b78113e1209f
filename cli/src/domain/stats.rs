//! Decoder for `docker stats --no-stream --format '{{json .}}'`.

use std::sync::LazyLock;

use dockhand_common::ContainerStats;
use regex::Regex;
use serde::Deserialize;

use crate::domain::lines::{LineError, decode_lines};

/// `<number><unit>` as docker prints it, e.g. `1.5GiB`, `500kB`, `0B`.
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)\s*([kKmMgGtT]?)(i?)[bB]?$").expect("valid regex")
});

#[derive(Debug, Deserialize)]
struct StatsRow {
    #[serde(rename = "ID", alias = "Container")]
    id: Option<String>,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "CPUPerc", default)]
    cpu_perc: String,
    #[serde(rename = "MemUsage", default)]
    mem_usage: String,
    #[serde(rename = "MemPerc", default)]
    mem_perc: String,
}

/// `"12.50%"` ⇒ `12.5`. Anything unparseable is `None`.
#[must_use]
pub fn parse_percent(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Convert a docker size string to bytes.
///
/// Units with an `i` marker are binary (`KiB` = 1024), without it decimal
/// (`kB` = 1000). A bare number is bytes.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_size(raw: &str) -> Option<u64> {
    let caps = SIZE_RE.captures(raw.trim())?;
    let number: f64 = caps[1].parse().ok()?;
    let base: f64 = if caps[3].is_empty() { 1000.0 } else { 1024.0 };
    let exponent = match caps[2].to_ascii_lowercase().as_str() {
        "" => 0,
        "k" => 1,
        "m" => 2,
        "g" => 3,
        _ => 4,
    };
    let bytes = (number * base.powi(exponent)).round();
    (bytes.is_finite() && bytes >= 0.0).then_some(bytes as u64)
}

/// Split `"<used> / <limit>"` into byte counts.
#[must_use]
pub fn parse_mem_usage(raw: &str) -> (Option<u64>, Option<u64>) {
    match raw.split_once('/') {
        Some((used, limit)) => (parse_size(used), parse_size(limit)),
        None => (parse_size(raw), None),
    }
}

/// Decode one stats line.
///
/// # Errors
///
/// Returns [`LineError`] if the line is not a JSON object with an id.
pub fn decode_stats_line(line: &str) -> Result<ContainerStats, LineError> {
    let row: StatsRow = serde_json::from_str(line)?;
    let id = row
        .id
        .filter(|id| !id.is_empty())
        .ok_or(LineError::MissingField("ID"))?;
    let (mem_usage_bytes, mem_limit_bytes) = parse_mem_usage(&row.mem_usage);
    Ok(ContainerStats {
        id,
        name: row.name,
        cpu_percent: parse_percent(&row.cpu_perc),
        mem_usage_bytes,
        mem_limit_bytes,
        mem_percent: parse_percent(&row.mem_perc),
    })
}

/// Parse stats output. Rows reporting a zero memory limit belong to
/// containers that are not running and are left out.
#[must_use]
pub fn parse_stats(text: &str) -> Vec<ContainerStats> {
    decode_lines(text, "stats", decode_stats_line)
        .into_iter()
        .filter(|s| s.mem_limit_bytes != Some(0))
        .collect()
}
