//! Devcontainer CLI command builders.
//!
//! Each operation is a pure mapping from validated arguments to the
//! `devcontainer` CLI's argument vector, followed by one runner invocation.
//! Argument shapes are validated upstream by the tool schema layer; builders
//! assemble and execute only.

use crate::env;
use crate::runner::{self, CommandOutput, Invocation, RunnerError};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Handle to the external `devcontainer` CLI
#[derive(Debug, Clone)]
pub struct DevcontainerCli {
    binary: String,
    timeout: Option<Duration>,
}

impl DevcontainerCli {
    /// Create a handle invoking `binary` with an optional per-invocation
    /// deadline. The binary is resolved on `PATH` per call, before any
    /// process spawns.
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Handle with the conventional binary name
    pub fn with_defaults() -> Self {
        Self::new(env::DEVCONTAINER_BINARY, None)
    }

    /// Initialize and start the devcontainer for a workspace folder
    pub async fn up(
        &self,
        workspace_folder: &str,
        sink_path: Option<&Path>,
    ) -> Result<CommandOutput, RunnerError> {
        info!(workspace_folder, "devcontainer up");
        self.invoke(up_args(workspace_folder), sink_path).await
    }

    /// Run the user's postCreateCommand/postStartCommand scripts
    pub async fn run_user_commands(
        &self,
        workspace_folder: &str,
        sink_path: Option<&Path>,
    ) -> Result<CommandOutput, RunnerError> {
        info!(workspace_folder, "devcontainer run-user-commands");
        self.invoke(run_user_commands_args(workspace_folder), sink_path)
            .await
    }

    /// Execute a command inside the devcontainer.
    ///
    /// A non-empty `command` is an upstream precondition enforced by the
    /// schema layer before this builder is reached.
    pub async fn exec(
        &self,
        workspace_folder: &str,
        command: &[String],
        sink_path: Option<&Path>,
    ) -> Result<CommandOutput, RunnerError> {
        info!(workspace_folder, command = ?command, "devcontainer exec");
        self.invoke(exec_args(workspace_folder, command), sink_path)
            .await
    }

    async fn invoke(
        &self,
        args: Vec<String>,
        sink_path: Option<&Path>,
    ) -> Result<CommandOutput, RunnerError> {
        let mut invocation = Invocation::new(&self.binary, args);
        if let Some(path) = sink_path {
            invocation = invocation.with_sink_path(path.to_path_buf());
        }
        if let Some(timeout) = self.timeout {
            invocation = invocation.with_timeout(timeout);
        }
        runner::run(invocation).await
    }
}

fn up_args(workspace_folder: &str) -> Vec<String> {
    vec![
        "up".to_string(),
        "--workspace-folder".to_string(),
        workspace_folder.to_string(),
    ]
}

fn run_user_commands_args(workspace_folder: &str) -> Vec<String> {
    vec![
        "run-user-commands".to_string(),
        "--workspace-folder".to_string(),
        workspace_folder.to_string(),
    ]
}

fn exec_args(workspace_folder: &str, command: &[String]) -> Vec<String> {
    let mut args = vec![
        "exec".to_string(),
        "--workspace-folder".to_string(),
        workspace_folder.to_string(),
    ];
    args.extend(command.iter().cloned());
    args
}
