//! Names, paths, and fixed command-line contracts used throughout the server.
//!
//! This module centralizes the hardcoded directory names, binary names, and
//! docker label conventions so they are defined in exactly one place.

use std::path::{Path, PathBuf};

/// Name of the devcontainer CLI binary resolved on `PATH`
pub const DEVCONTAINER_BINARY: &str = "devcontainer";

/// Name of the docker CLI binary resolved on `PATH`
pub const DOCKER_BINARY: &str = "docker";

/// Label key stamped on every container managed by the devcontainer CLI.
/// Enumeration and cleanup filter on this label.
pub const DEVCONTAINER_LABEL: &str = "dev.containers.id";

/// `docker ps --format` template used by the list tool
pub const PS_FORMAT: &str = "\"{psID: {{.ID}}, psName: {{.Names}}, workspaceFolder: {{.Label \"devcontainer.local_folder\"}}, container: {{.Label \"dev.containers.id\"}}}\"";

/// Result text when cleanup finds no managed containers
pub const NOTHING_TO_CLEAN_UP: &str =
    "No 'docker ps' results found; all devcontainers have already been cleaned up.";

/// Directory name marking a devcontainer configuration root
pub const MARKER_DIR_NAME: &str = ".devcontainer";

/// Configuration file expected inside a marker directory
pub const MARKER_FILE_NAME: &str = "devcontainer.json";

/// Directory names never descended into during workspace discovery:
/// dependency caches, build output, and version-control metadata.
pub const SKIP_DIR_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "dist",
    "build",
    "out",
    "vendor",
    "__pycache__",
    ".venv",
    ".cache",
];

/// Configuration file name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "mcp-devcontainers.toml";

/// Application directory name under the user's config directory
pub const APP_CONFIG_DIR_NAME: &str = "mcp-devcontainers";

/// Build the user config file path from a home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    home_dir
        .join(".config")
        .join(APP_CONFIG_DIR_NAME)
        .join("config.toml")
}

/// Whether a directory name is on the discovery deny-list
pub fn is_skipped_dir(name: &str) -> bool {
    SKIP_DIR_NAMES.contains(&name)
}
