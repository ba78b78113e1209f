//! Captured result of a single remote command.

use anyhow::Result;

use crate::domain::error::CommandError;

/// Everything one remote command produced, available only after it exited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the command was killed by a signal.
    pub exit_status: Option<i32>,
}

impl ExecResult {
    #[must_use]
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>, exit_status: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status,
        }
    }

    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }

    /// Stdout followed by stderr, for commands whose full transcript matters.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let mut text = self.stdout_text();
        let stderr = self.stderr_text();
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }
        text
    }

    /// Convert into a [`CommandError`] when the command failed.
    ///
    /// Failure means a nonzero (or absent) exit status, or stderr output with
    /// nothing on stdout. The message is stderr, else stdout, else `fallback`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] as described above.
    pub fn ensure_success(self, fallback: &str) -> Result<Self> {
        let stderr = self.stderr_text();
        let stdout = self.stdout_text();
        let stderr_only = !stderr.trim().is_empty() && stdout.trim().is_empty();
        if self.success() && !stderr_only {
            return Ok(self);
        }
        let message = [stderr.trim(), stdout.trim()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string();
        Err(CommandError {
            message,
            exit_status: self.exit_status,
        }
        .into())
    }

    /// Like [`ensure_success`](Self::ensure_success) but judged by exit
    /// status alone; stderr noise on a zero exit is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] carrying stderr, else `fallback`.
    pub fn ensure_exit_zero(self, fallback: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let stderr = self.stderr_text();
        let message = Some(stderr.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string();
        Err(CommandError {
            message,
            exit_status: self.exit_status,
        }
        .into())
    }
}
