//! Docker CLI command builders for managed devcontainer enumeration and
//! bulk removal.
//!
//! Containers started by the devcontainer CLI carry the
//! [`env::DEVCONTAINER_LABEL`] label; both operations filter on it. Cleanup
//! enumerates matching ids first and short-circuits when there is nothing to
//! remove, so `docker rm -f` is never invoked with an empty target list.

use crate::env;
use crate::runner::{self, CommandOutput, Invocation, RunnerError};
use std::time::Duration;
use tracing::info;

/// Handle to the external `docker` CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    timeout: Option<Duration>,
}

/// Outcome of a cleanup call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// No managed containers existed; removal was never attempted
    Nothing,
    /// Managed containers were removed
    Removed(CommandOutput),
}

impl CleanupOutcome {
    /// Render the user-visible result text
    pub fn render(&self) -> String {
        match self {
            CleanupOutcome::Nothing => env::NOTHING_TO_CLEAN_UP.to_string(),
            CleanupOutcome::Removed(output) => output.render(),
        }
    }
}

impl DockerCli {
    /// Create a handle invoking `binary` with an optional per-invocation
    /// deadline
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Handle with the conventional binary name
    pub fn with_defaults() -> Self {
        Self::new(env::DOCKER_BINARY, None)
    }

    /// List all devcontainer-managed containers in the fixed ps format
    pub async fn list(&self) -> Result<CommandOutput, RunnerError> {
        info!("docker list devcontainers");
        self.invoke(list_args()).await
    }

    /// Remove every devcontainer-managed container.
    ///
    /// Enumerates ids via a separate listing invocation first; zero ids
    /// short-circuits to [`CleanupOutcome::Nothing`].
    pub async fn cleanup(&self) -> Result<CleanupOutcome, RunnerError> {
        let listing = self.invoke(ps_ids_args()).await?;
        let ids = container_ids(&listing.stdout);
        info!(count = ids.len(), "docker cleanup enumerated devcontainers");
        self.remove(ids).await
    }

    async fn remove(&self, ids: Vec<String>) -> Result<CleanupOutcome, RunnerError> {
        if ids.is_empty() {
            return Ok(CleanupOutcome::Nothing);
        }
        let mut args = vec!["rm".to_string(), "-f".to_string()];
        args.extend(ids);
        Ok(CleanupOutcome::Removed(self.invoke(args).await?))
    }

    async fn invoke(&self, args: Vec<String>) -> Result<CommandOutput, RunnerError> {
        let mut invocation = Invocation::new(&self.binary, args);
        if let Some(timeout) = self.timeout {
            invocation = invocation.with_timeout(timeout);
        }
        runner::run(invocation).await
    }
}

fn list_args() -> Vec<String> {
    vec![
        "ps".to_string(),
        "-a".to_string(),
        "--filter".to_string(),
        format!("label={}", env::DEVCONTAINER_LABEL),
        "--format".to_string(),
        env::PS_FORMAT.to_string(),
    ]
}

fn ps_ids_args() -> Vec<String> {
    vec![
        "ps".to_string(),
        "-aq".to_string(),
        "-f".to_string(),
        format!("label={}", env::DEVCONTAINER_LABEL),
    ]
}

fn container_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
