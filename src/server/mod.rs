//! MCP protocol layer.
//!
//! Registers the devcontainer tool box with the `rmcp` server runtime and
//! serves it over the selected transport. Stdio is the default (stdout
//! belongs to the transport, so all logging goes to stderr); tcp serves each
//! accepted connection from its own spawned task. The server owns no ambient
//! background tasks: a transport's lifetime is bounded by its connection.

use anyhow::Context;
use clap::ValueEnum;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// One tool method per operation, routed with compile-time exhaustiveness.
pub mod service;

/// Tool parameter schemas (the wire contract).
pub mod types;

pub use service::DevcontainersService;

/// Wire transport for the MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Serve a single session over stdin/stdout
    Stdio,
    /// Accept TCP connections, one session per connection
    Tcp,
}

/// Options for [`run`]
#[derive(Debug, Clone)]
pub struct McpServerOptions {
    pub transport: Transport,
    pub port: u16,
}

/// Serve the tool box until the transport closes.
///
/// For stdio this returns when the client disconnects. For tcp this accepts
/// connections forever; per-connection failures are logged and do not take
/// the listener down.
pub async fn run(service: DevcontainersService, options: &McpServerOptions) -> anyhow::Result<()> {
    match options.transport {
        Transport::Stdio => {
            info!("MCP server starting on stdio");
            let server = service
                .serve(stdio())
                .await
                .context("failed to start MCP server on stdio")?;
            server.waiting().await.context("MCP server error")?;
            Ok(())
        }
        Transport::Tcp => {
            let addr = format!("127.0.0.1:{}", options.port);
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!(%addr, "MCP server listening");

            loop {
                let (stream, peer) = listener
                    .accept()
                    .await
                    .context("failed to accept connection")?;
                info!(%peer, "new MCP connection");

                let service = service.clone();
                tokio::spawn(async move {
                    match service.serve(stream).await {
                        Ok(server) => {
                            if let Err(error) = server.waiting().await {
                                warn!(%peer, %error, "MCP connection ended with error");
                            } else {
                                info!(%peer, "MCP connection closed");
                            }
                        }
                        Err(error) => warn!(%peer, %error, "failed to serve MCP connection"),
                    }
                });
            }
        }
    }
}
