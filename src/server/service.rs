//! The devcontainer tool box.
//!
//! One typed method per tool, routed by the generated tool router, so the
//! dispatch set is closed at compile time. Tool failures are reported as
//! labeled `is_error` results carrying the rendered error text; protocol
//! errors are reserved for requests that violate the schema contract.

use crate::cli::Settings;
use crate::devcontainer::DevcontainerCli;
use crate::discovery::{self, ScanLimits};
use crate::docker::DockerCli;
use crate::server::types::{ExecParams, RunUserCommandsParams, UpParams, WorkspaceFoldersParams};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use std::fmt;
use std::path::PathBuf;

const UP_LABEL: &str = "Devcontainer Up";
const RUN_LABEL: &str = "Devcontainer Run User Commands";
const EXEC_LABEL: &str = "Devcontainer Exec";
const CLEANUP_LABEL: &str = "Devcontainer Cleanup";
const LIST_LABEL: &str = "Devcontainer List";
const WORKSPACE_FOLDERS_LABEL: &str = "Devcontainer Workspace Folders";

/// MCP service exposing the devcontainer lifecycle tools
#[derive(Clone)]
pub struct DevcontainersService {
    devcontainer: DevcontainerCli,
    docker: DockerCli,
    scan_limits: ScanLimits,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DevcontainersService {
    /// Build the service from resolved settings
    pub fn new(settings: &Settings) -> Self {
        let timeout = settings.command_timeout();
        Self {
            devcontainer: DevcontainerCli::new(&settings.devcontainer_binary, timeout),
            docker: DockerCli::new(&settings.docker_binary, timeout),
            scan_limits: ScanLimits {
                max_concurrent_dirs: settings.scan_concurrency,
            },
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Initializes and starts a devcontainer environment in the specified workspace folder. Ensures the devcontainer is operational and ready for development tasks."
    )]
    async fn devcontainer_up(
        &self,
        Parameters(params): Parameters<UpParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .devcontainer
            .up(&params.workspace_folder, params.stdio_file_path.as_deref())
            .await;
        Ok(match outcome {
            Ok(output) => success(UP_LABEL, &output.render()),
            Err(error) => failure(UP_LABEL, &error),
        })
    }

    #[tool(
        description = "Executes user-defined postCreateCommand and postStartCommand scripts within the devcontainer for the specified workspace. Use this to run setup or initialization tasks after container startup."
    )]
    async fn devcontainer_run_user_commands(
        &self,
        Parameters(params): Parameters<RunUserCommandsParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .devcontainer
            .run_user_commands(&params.workspace_folder, params.stdio_file_path.as_deref())
            .await;
        Ok(match outcome {
            Ok(output) => success(RUN_LABEL, &output.render()),
            Err(error) => failure(RUN_LABEL, &error),
        })
    }

    #[tool(
        description = "Runs a custom shell command inside the devcontainer for the specified workspace. Useful for executing arbitrary commands or scripts within the devcontainer environment."
    )]
    async fn devcontainer_exec(
        &self,
        Parameters(params): Parameters<ExecParams>,
    ) -> Result<CallToolResult, McpError> {
        // Schema contract: rejected before any process is spawned.
        if params.command.is_empty() {
            return Err(McpError::invalid_params(
                "command must contain at least one element",
                Some(serde_json::json!({ "field": "command" })),
            ));
        }
        let outcome = self
            .devcontainer
            .exec(
                &params.workspace_folder,
                &params.command,
                params.stdio_file_path.as_deref(),
            )
            .await;
        Ok(match outcome {
            Ok(output) => success(EXEC_LABEL, &output.render()),
            Err(error) => failure(EXEC_LABEL, &error),
        })
    }

    #[tool(description = "Runs docker command to cleanup all devcontainer environments.")]
    async fn devcontainer_cleanup(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.docker.cleanup().await {
            Ok(outcome) => success(CLEANUP_LABEL, &outcome.render()),
            Err(error) => failure(CLEANUP_LABEL, &error),
        })
    }

    #[tool(description = "Runs docker command to list all devcontainer environments.")]
    async fn devcontainer_list(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.docker.list().await {
            Ok(output) => success(LIST_LABEL, &output.render()),
            Err(error) => failure(LIST_LABEL, &error),
        })
    }

    #[tool(
        description = "Scans a directory tree to find all workspace folders containing a devcontainer configuration."
    )]
    async fn devcontainer_workspace_folders(
        &self,
        Parameters(params): Parameters<WorkspaceFoldersParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = discovery::discover(params.root_path.as_deref(), self.scan_limits).await;
        Ok(match outcome {
            Ok(folders) => success(WORKSPACE_FOLDERS_LABEL, &render_folders(&folders)),
            Err(error) => failure(WORKSPACE_FOLDERS_LABEL, &error),
        })
    }
}

#[tool_handler]
impl ServerHandler for DevcontainersService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Manages devcontainer environments: start a workspace's devcontainer, run its \
                 post-create hooks, execute commands inside it, list or clean up managed \
                 containers, and discover workspace folders with a devcontainer configuration."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn success(label: &str, body: &str) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!("{label} result: {body}"))])
}

fn failure(label: &str, error: &dyn fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{label} failure: {error}"))])
}

fn render_folders(folders: &[PathBuf]) -> String {
    folders
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
