//! Shared mock infrastructure for unit tests.
//!
//! [`RecordingExecutor`] answers commands from a table of canned results
//! keyed by command prefix and records every command it was asked to run,
//! so tests can assert both on what was issued and on what was not.

#![allow(clippy::expect_used, dead_code)]

use std::cell::RefCell;

use anyhow::Result;
use dockhand_cli::application::ports::{ProgressReporter, RemoteExecutor};
use dockhand_cli::application::stream::{CancelToken, StreamEvent, StreamHandle};
use dockhand_cli::domain::ExecResult;
use tokio::sync::mpsc;

// ── Executor ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingExecutor {
    responses: Vec<(String, ExecResult)>,
    stream_events: Vec<StreamEvent>,
    issued: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix`. Earlier entries win.
    pub fn respond(mut self, prefix: &str, stdout: &str, stderr: &str, exit: i32) -> Self {
        self.responses
            .push((prefix.to_string(), ExecResult::new(stdout, stderr, Some(exit))));
        self
    }

    pub fn ok(self, prefix: &str, stdout: &str) -> Self {
        self.respond(prefix, stdout, "", 0)
    }

    pub fn exit(self, prefix: &str, code: i32) -> Self {
        self.respond(prefix, "", "", code)
    }

    pub fn stream_events(mut self, events: Vec<StreamEvent>) -> Self {
        self.stream_events = events;
        self
    }

    /// Every command issued so far, in order.
    pub fn issued(&self) -> Vec<String> {
        self.issued.borrow().clone()
    }

    pub fn issued_matching(&self, prefix: &str) -> Vec<String> {
        self.issued()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl RemoteExecutor for RecordingExecutor {
    async fn execute(&self, command: &str) -> Result<ExecResult> {
        self.issued.borrow_mut().push(command.to_string());
        self.responses
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .ok_or_else(|| anyhow::anyhow!("no canned response for: {command}"))
    }

    async fn stream(&self, command: &str) -> Result<StreamHandle> {
        self.issued.borrow_mut().push(command.to_string());
        let (tx, rx) = mpsc::channel(self.stream_events.len().max(1));
        for event in &self.stream_events {
            tx.try_send(event.clone()).expect("buffer sized to fit");
        }
        Ok(StreamHandle::new(rx, CancelToken::new()))
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}

// ── Inventory fixtures ────────────────────────────────────────────────────────

pub fn ps_line(id: &str, name: &str, state: &str, project: Option<&str>) -> String {
    let labels = project
        .map(|p| format!("com.docker.compose.project={p},com.docker.compose.service={name}"))
        .unwrap_or_default();
    serde_json::json!({
        "ID": id,
        "Names": name,
        "Image": format!("{name}:latest"),
        "State": state,
        "Status": if state == "running" { "Up 2 hours" } else { "Exited (0) 3 days ago" },
        "CreatedAt": "2026-01-01 10:00:00 +0000 UTC",
        "Ports": "",
        "Labels": labels,
    })
    .to_string()
}

pub fn inventory(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
