//! Parsers for the host metrics commands behind the system overview.

use dockhand_common::{DiskOverview, MemoryOverview};

/// `nproc` output. Unparseable output counts as zero cores.
#[must_use]
pub fn parse_cores(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// First three fields of `/proc/loadavg`.
#[must_use]
pub fn parse_loadavg(text: &str) -> Vec<f64> {
    text.split_whitespace()
        .take(3)
        .filter_map(|field| field.parse().ok())
        .collect()
}

/// The `Mem:` row of `free -m`.
#[must_use]
pub fn parse_free(text: &str) -> MemoryOverview {
    let Some(row) = text.lines().find(|line| line.trim_start().starts_with("Mem:")) else {
        return MemoryOverview::default();
    };
    let fields: Vec<u64> = row
        .split_whitespace()
        .skip(1)
        .take(3)
        .map(|f| f.parse().unwrap_or(0))
        .collect();
    let total_mb = fields.first().copied().unwrap_or(0);
    let used_mb = fields.get(1).copied().unwrap_or(0);
    let free_mb = fields.get(2).copied().unwrap_or(0);
    MemoryOverview {
        total_mb,
        used_mb,
        free_mb,
        used_percent: percent_of(used_mb, total_mb),
    }
}

/// Rows of `df -B1` whose filesystem is a device path.
#[must_use]
pub fn parse_df(text: &str) -> Vec<DiskOverview> {
    text.lines()
        .skip(1)
        .filter(|line| line.starts_with('/'))
        .map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let num = |i: usize| parts.get(i).and_then(|p| p.parse().ok()).unwrap_or(0);
            DiskOverview {
                fs: parts.first().copied().unwrap_or_default().to_string(),
                size_bytes: num(1),
                used_bytes: num(2),
                avail_bytes: num(3),
                used_percent: parts
                    .get(4)
                    .and_then(|p| p.trim_end_matches('%').parse().ok())
                    .unwrap_or(0),
                target: parts.get(5).copied().unwrap_or("/").to_string(),
            }
        })
        .collect()
}

fn percent_of(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part * 100 + whole / 2) / whole
}
