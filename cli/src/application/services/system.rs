//! Application service: host overview and connectivity check.

use anyhow::Result;
use dockhand_common::SystemOverview;

use crate::application::ports::RemoteExecutor;
use crate::domain::system::{parse_cores, parse_df, parse_free, parse_loadavg};

const CONNECTION_PROBE: &str = "echo ssh-ok";

/// Cores, load averages, memory and disks of the docker host. The four
/// probes run concurrently, each on its own connection.
///
/// # Errors
///
/// Fails if any probe cannot connect, or if `nproc`, `/proc/loadavg` or
/// `free` report failure.
pub async fn system_overview(exec: &impl RemoteExecutor) -> Result<SystemOverview> {
    let (cores, load, memory, disk) = tokio::try_join!(
        exec.execute("nproc"),
        exec.execute("cat /proc/loadavg"),
        exec.execute("free -m"),
        exec.execute("df -B1"),
    )?;
    Ok(SystemOverview {
        cores: parse_cores(&cores.ensure_success("nproc failed")?.stdout_text()),
        load: parse_loadavg(&load.ensure_success("cannot read /proc/loadavg")?.stdout_text()),
        memory: parse_free(&memory.ensure_success("free failed")?.stdout_text()),
        // df exits nonzero when a single mount is unreadable; keep the rest.
        disk: parse_df(&disk.stdout_text()),
    })
}

/// Round-trip a trivial command; returns what the host echoed.
///
/// # Errors
///
/// Propagates connection errors and a `CommandError` on failure.
pub async fn test_connection(exec: &impl RemoteExecutor) -> Result<String> {
    let result = exec
        .execute(CONNECTION_PROBE)
        .await?
        .ensure_success("Connection test failed")?;
    Ok(result.stdout_text().trim().to_string())
}
