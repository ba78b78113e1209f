//! Domain types and validators for dockhand configuration.
//!
//! Pure functions only, no I/O, no async, no filesystem access.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

const REDACTED: &str = "<redacted>";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dockhand/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DockhandConfig {
    /// How to reach the docker host.
    pub ssh: SshSettings,
}

/// Connection settings for the remote docker host.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    /// Base64-encoded private key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub connect_timeout_ms: u64,
    /// Known-hosts file; the ssh client default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_hosts: Option<PathBuf>,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SSH_PORT,
            username: None,
            private_key: None,
            private_key_path: None,
            private_key_passphrase: None,
            password: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            known_hosts: None,
        }
    }
}

impl fmt::Debug for SshSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("SshSettings")
            .field("host", &redacted.host)
            .field("port", &redacted.port)
            .field("username", &redacted.username)
            .field("private_key", &redacted.private_key)
            .field("private_key_path", &redacted.private_key_path)
            .field("private_key_passphrase", &redacted.private_key_passphrase)
            .field("password", &redacted.password)
            .field("connect_timeout_ms", &redacted.connect_timeout_ms)
            .field("known_hosts", &redacted.known_hosts)
            .finish()
    }
}

/// `VPS_*` environment overrides, read with `envy::prefixed("VPS_")`.
#[derive(Debug, Default, Deserialize)]
pub struct SshEnvOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub private_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub private_key_passphrase: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub known_hosts: Option<PathBuf>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|v| !v.as_os_str().is_empty())
}

impl SshSettings {
    /// Overlay environment values; unset or empty variables keep the file value.
    pub fn apply_env(&mut self, env: SshEnvOverrides) {
        if let Some(v) = non_empty(env.host) {
            self.host = Some(v);
        }
        if let Some(v) = env.port {
            self.port = v;
        }
        if let Some(v) = non_empty(env.username) {
            self.username = Some(v);
        }
        if let Some(v) = non_empty(env.private_key) {
            self.private_key = Some(v);
        }
        if let Some(v) = non_empty_path(env.private_key_path) {
            self.private_key_path = Some(v);
        }
        if let Some(v) = non_empty(env.private_key_passphrase) {
            self.private_key_passphrase = Some(v);
        }
        if let Some(v) = non_empty(env.password) {
            self.password = Some(v);
        }
        if let Some(v) = env.connect_timeout_ms {
            self.connect_timeout_ms = v;
        }
        if let Some(v) = non_empty_path(env.known_hosts) {
            self.known_hosts = Some(v);
        }
    }

    /// Copy with every secret replaced by a placeholder, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let hide = |v: &Option<String>| v.as_ref().map(|_| REDACTED.to_string());
        Self {
            private_key: hide(&self.private_key),
            private_key_passphrase: hide(&self.private_key_passphrase),
            password: hide(&self.password),
            ..self.clone()
        }
    }

    /// Validate and freeze the settings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when host or username is unset.
    /// - [`ConfigError::InvalidHost`] when the host could be read as an option.
    /// - [`ConfigError::NoCredential`] without key material, key path or password.
    /// - [`ConfigError::InvalidKeyEncoding`] when the key is not base64.
    /// - [`ConfigError::ZeroTimeout`] for a zero timeout.
    pub fn connection_params(&self) -> Result<ConnectionParams> {
        let host = self
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .ok_or(ConfigError::Missing("host (VPS_HOST)"))?;
        if host.starts_with('-') || host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidHost(host).into());
        }
        let username = self
            .username
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::Missing("username (VPS_USERNAME)"))?;
        if self.private_key.is_none() && self.private_key_path.is_none() && self.password.is_none() {
            return Err(ConfigError::NoCredential.into());
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout.into());
        }
        let private_key = self
            .private_key
            .as_deref()
            .map(|encoded| {
                let compact: String = encoded.split_whitespace().collect();
                BASE64
                    .decode(compact)
                    .map_err(|e| ConfigError::InvalidKeyEncoding(e.to_string()))
            })
            .transpose()?;
        Ok(ConnectionParams {
            host,
            port: self.port,
            username,
            private_key,
            private_key_path: self.private_key_path.clone(),
            passphrase: self.private_key_passphrase.clone(),
            password: self.password.clone(),
            timeout: Duration::from_millis(self.connect_timeout_ms),
            known_hosts: self.known_hosts.clone(),
        })
    }
}

// ── Connection parameters ────────────────────────────────────────────────────

/// Validated, immutable connection parameters.
#[derive(Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Decoded private key material.
    pub private_key: Option<Vec<u8>>,
    pub private_key_path: Option<PathBuf>,
    pub passphrase: Option<String>,
    pub password: Option<String>,
    /// Deadline for a whole `execute` call, and the connect timeout.
    pub timeout: Duration,
    pub known_hosts: Option<PathBuf>,
}

impl ConnectionParams {
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Whether the client needs an askpass helper.
    #[must_use]
    pub fn needs_askpass(&self) -> bool {
        self.password.is_some() || self.passphrase.is_some()
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("private_key", &self.private_key.as_ref().map(|_| REDACTED))
            .field("private_key_path", &self.private_key_path)
            .field("passphrase", &self.passphrase.as_ref().map(|_| REDACTED))
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("timeout", &self.timeout)
            .field("known_hosts", &self.known_hosts)
            .finish()
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
