//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{DockhandConfig, SshEnvOverrides};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DOCKHAND_CONFIG";

/// Prefix of the connection environment variables (`VPS_HOST`, ...).
pub const ENV_PREFIX: &str = "VPS_";

/// Older name for `VPS_CONNECT_TIMEOUT_MS`, still honoured.
const LEGACY_TIMEOUT_ENV: &str = "SSH_CONNECT_TIMEOUT_MS";

/// Production `ConfigStore`: a YAML file on disk overlaid with `VPS_*`
/// environment variables.
pub struct YamlConfigStore;

impl YamlConfigStore {
    fn load_file(&self) -> Result<DockhandConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(DockhandConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(DockhandConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}

/// Read `VPS_*` overrides from the process environment.
///
/// # Errors
///
/// Returns an error if a variable has the wrong type (e.g. a non-numeric port).
pub fn env_overrides() -> Result<SshEnvOverrides> {
    let mut overrides: SshEnvOverrides = envy::prefixed(ENV_PREFIX)
        .from_env()
        .context("invalid VPS_* environment variable")?;
    if overrides.connect_timeout_ms.is_none() {
        if let Ok(raw) = std::env::var(LEGACY_TIMEOUT_ENV) {
            let ms = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {LEGACY_TIMEOUT_ENV}: {raw}"))?;
            overrides.connect_timeout_ms = Some(ms);
        }
    }
    Ok(overrides)
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DockhandConfig> {
        let mut config = self.load_file()?;
        config.ssh.apply_env(env_overrides()?);
        tracing::debug!(ssh = ?config.ssh, "configuration loaded");
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".dockhand").join("config.yaml"))
    }
}
