//! Scripted `RemoteExecutor` for service tests.
//!
//! Responses are matched by command prefix, first match wins. Every command
//! issued is recorded so tests can assert on exact shapes and on the
//! absence of remote calls.

use std::cell::RefCell;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::application::ports::RemoteExecutor;
use crate::application::stream::{CancelToken, StreamEvent, StreamHandle};
use crate::domain::ExecResult;

#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Vec<(String, ExecResult)>,
    stream_events: Vec<StreamEvent>,
    pub commands: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix`.
    pub fn on(mut self, prefix: &str, stdout: &str, stderr: &str, exit: Option<i32>) -> Self {
        self.responses
            .push((prefix.to_string(), ExecResult::new(stdout, stderr, exit)));
        self
    }

    pub fn ok(self, prefix: &str, stdout: &str) -> Self {
        self.on(prefix, stdout, "", Some(0))
    }

    pub fn fail(self, prefix: &str, exit: i32) -> Self {
        self.on(prefix, "", "", Some(exit))
    }

    pub fn with_stream(mut self, events: Vec<StreamEvent>) -> Self {
        self.stream_events = events;
        self
    }

    pub fn issued(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl RemoteExecutor for ScriptedExecutor {
    async fn execute(&self, command: &str) -> Result<ExecResult> {
        self.commands.borrow_mut().push(command.to_string());
        self.responses
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .ok_or_else(|| anyhow::anyhow!("unexpected command: {command}"))
    }

    async fn stream(&self, command: &str) -> Result<StreamHandle> {
        self.commands.borrow_mut().push(command.to_string());
        let (tx, rx) = mpsc::channel(self.stream_events.len().max(1));
        for event in &self.stream_events {
            tx.try_send(event.clone()).ok();
        }
        Ok(StreamHandle::new(rx, CancelToken::new()))
    }
}
