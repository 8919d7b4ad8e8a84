//! # mcp-devcontainers
//!
//! An MCP (Model Context Protocol) server that exposes devcontainer
//! lifecycle operations as callable tools, delegating the actual work to the
//! external `devcontainer` and `docker` command-line binaries.
//!
//! ## Architecture Overview
//!
//! - **[`runner`]**: subprocess execution engine — spawns one external
//!   command, multiplexes stdout/stderr, tees stdout into an output sink
//!   while buffering it, and classifies the exit status
//! - **[`devcontainer`]** / **[`docker`]**: per-operation command builders
//!   mapping validated arguments to argument vectors
//! - **[`discovery`]**: concurrent workspace discovery with bounded
//!   parallelism and a fixed prune list
//! - **[`server`]**: the MCP tool box and transports (stdio, tcp)
//! - **[`cli`]**: argument parsing and TOML configuration
//!
//! ## Tools
//!
//! `devcontainer_up`, `devcontainer_run_user_commands`, `devcontainer_exec`,
//! `devcontainer_cleanup`, `devcontainer_list`, and
//! `devcontainer_workspace_folders`. Each tool reports either a labeled
//! success text (`"<label> result: ..."`) or a labeled failure with the
//! captured diagnostic output — never a silent or partial result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_devcontainers::cli::Settings;
//! use mcp_devcontainers::server::{self, DevcontainersService, McpServerOptions, Transport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = DevcontainersService::new(&Settings::default());
//!     let options = McpServerOptions {
//!         transport: Transport::Stdio,
//!         port: 8080,
//!     };
//!     server::run(service, &options).await
//! }
//! ```

/// Command-line interface and configuration loading.
pub mod cli;

/// Devcontainer CLI command builders (up, run-user-commands, exec).
pub mod devcontainer;

/// Concurrent workspace discovery engine.
pub mod discovery;

/// Docker CLI command builders (list, cleanup) for managed containers.
pub mod docker;

/// Names, paths, and fixed command-line contracts.
pub mod env;

/// Subprocess execution and output capture.
pub mod runner;

/// MCP protocol layer: tool box and transports.
pub mod server;

// Re-export the types a typical embedder touches
pub use devcontainer::DevcontainerCli;
pub use discovery::{DiscoveryError, ScanLimits, discover};
pub use docker::{CleanupOutcome, DockerCli};
pub use runner::{CommandOutput, FailureReason, Invocation, OutputSink, RunnerError, run};
pub use server::{DevcontainersService, McpServerOptions, Transport};
