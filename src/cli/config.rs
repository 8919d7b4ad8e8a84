//! Configuration discovery and loading.
//!
//! Discovery hierarchy:
//! 1. Current directory: ./mcp-devcontainers.toml
//! 2. User config: ~/.config/mcp-devcontainers/config.toml
//! 3. System config: /etc/mcp-devcontainers/config.toml (unix)
//! 4. Built-in defaults

use crate::discovery::DEFAULT_SCAN_CONCURRENCY;
use crate::env;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default deadline for one subprocess invocation, in seconds.
/// Devcontainer builds can legitimately run long; the default is generous
/// rather than tight, and 0 disables the deadline entirely.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 3600;

/// Resolved server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name or path of the devcontainer CLI binary
    pub devcontainer_binary: String,
    /// Name or path of the docker CLI binary
    pub docker_binary: String,
    /// Per-invocation deadline in seconds; 0 disables
    pub command_timeout_secs: u64,
    /// Bound on concurrently listed directories during discovery
    pub scan_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            devcontainer_binary: env::DEVCONTAINER_BINARY.to_string(),
            docker_binary: env::DOCKER_BINARY.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

impl Settings {
    /// Load from a TOML file; absent keys fall back to defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(settings)
    }

    /// The invocation deadline as a duration, `None` when disabled
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load settings using the hierarchy
    pub fn discover() -> anyhow::Result<Settings> {
        if let Some(config_path) = Self::find_config_file() {
            info!(path = %config_path.display(), "loading configuration");
            return Settings::from_toml_file(config_path);
        }

        debug!("no configuration file found, using defaults");
        Ok(Settings::default())
    }

    /// Find the first existing configuration file in priority order
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::config_candidates() {
            debug!(path = %candidate.display(), "checking for config file");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    fn config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::CONFIG_FILE_NAME));
        }

        if let Some(home_dir) = Self::home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/mcp-devcontainers/config.toml"));

        candidates
    }

    fn home_dir() -> Option<PathBuf> {
        std_env::var_os("HOME")
            .or_else(|| std_env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }
}
