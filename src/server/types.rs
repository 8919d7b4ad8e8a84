//! Tool parameter schemas.
//!
//! Field names and descriptions are the wire contract exposed to MCP
//! clients; doc comments become JSON schema descriptions via `schemars`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parameters for `devcontainer_up`
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpParams {
    /// Path to the workspace folder (string)
    pub workspace_folder: String,
    /// Path for output logs (string), default discards output
    pub stdio_file_path: Option<PathBuf>,
}

/// Parameters for `devcontainer_run_user_commands`
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunUserCommandsParams {
    /// Path to the workspace folder (string)
    pub workspace_folder: String,
    /// Path for output logs (string), default discards output
    pub stdio_file_path: Option<PathBuf>,
}

/// Parameters for `devcontainer_exec`
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecParams {
    /// Path to the workspace folder (string)
    pub workspace_folder: String,
    /// Path for output logs (string), default discards output
    pub stdio_file_path: Option<PathBuf>,
    /// Command to execute (array of string)
    #[schemars(length(min = 1))]
    pub command: Vec<String>,
}

/// Parameters for `devcontainer_workspace_folders`
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFoldersParams {
    /// Root directory to scan (string), defaults to the current working directory
    pub root_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_deserialize_from_camel_case() {
        let params: ExecParams = serde_json::from_str(
            r#"{"workspaceFolder": "/work", "command": ["npm", "test"]}"#,
        )
        .unwrap();
        assert_eq!(params.workspace_folder, "/work");
        assert_eq!(params.command, vec!["npm", "test"]);
        assert!(params.stdio_file_path.is_none());
    }

    #[test]
    fn test_optional_sink_path_accepted() {
        let params: UpParams = serde_json::from_str(
            r#"{"workspaceFolder": "/work", "stdioFilePath": "/tmp/up.log"}"#,
        )
        .unwrap();
        assert_eq!(params.stdio_file_path, Some(PathBuf::from("/tmp/up.log")));
    }

    #[test]
    fn test_workspace_folders_root_is_optional() {
        let params: WorkspaceFoldersParams = serde_json::from_str("{}").unwrap();
        assert!(params.root_path.is_none());
    }
}
