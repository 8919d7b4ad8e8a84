use mcp_devcontainers::cli::{Args, ConfigDiscovery, RunMode, Settings};
use mcp_devcontainers::discovery::{self, ScanLimits};
use mcp_devcontainers::server::{self, DevcontainersService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout belongs to the stdio transport; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mcp_devcontainers=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::from_toml_file(path)?,
        None => ConfigDiscovery::discover()?,
    };

    match args.mode() {
        RunMode::Serve(options) => {
            info!(transport = ?options.transport, "starting mcp-devcontainers");
            let service = DevcontainersService::new(&settings);
            server::run(service, &options).await
        }
        RunMode::Discover { root } => {
            let limits = ScanLimits {
                max_concurrent_dirs: settings.scan_concurrency,
            };
            let folders = discovery::discover(root.as_deref(), limits).await?;
            for folder in folders {
                println!("{}", folder.display());
            }
            Ok(())
        }
    }
}
