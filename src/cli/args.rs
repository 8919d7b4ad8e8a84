//! Command line argument parsing.
//!
//! Subcommands:
//! - `serve`: run the MCP server (default when no subcommand is given)
//! - `discover`: one-shot workspace discovery printed to stdout

use crate::server::{McpServerOptions, Transport};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// What the binary was asked to do
#[derive(Debug)]
pub enum RunMode {
    Serve(McpServerOptions),
    Discover { root: Option<PathBuf> },
}

#[derive(Debug, Parser)]
#[command(name = "mcp-devcontainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server exposing devcontainer lifecycle operations as callable tools")]
pub struct Args {
    /// Configuration file path (overrides the discovery hierarchy)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the MCP server
    Serve {
        /// Transport to serve on
        #[arg(long, value_enum, default_value = "stdio")]
        transport: Transport,
        /// TCP port (tcp transport only)
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Scan a directory tree for devcontainer workspace folders
    Discover {
        /// Root directory to scan (defaults to the current directory)
        root: Option<PathBuf>,
    },
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Map parsed arguments onto a run mode; no subcommand serves stdio
    pub fn mode(&self) -> RunMode {
        match &self.command {
            Some(Commands::Serve { transport, port }) => RunMode::Serve(McpServerOptions {
                transport: *transport,
                port: *port,
            }),
            Some(Commands::Discover { root }) => RunMode::Discover { root: root.clone() },
            None => RunMode::Serve(McpServerOptions {
                transport: Transport::Stdio,
                port: 8080,
            }),
        }
    }
}
