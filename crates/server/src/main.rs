//! Taskdesk API server binary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use server::{run_server, Config, ServerState};

/// Task assignment and approval service.
#[derive(Parser)]
#[command(name = "taskdesk-server", version, about)]
struct Args {
    /// Bind host (overrides TASKDESK_HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides TASKDESK_PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Directory for the JSON stores and proof blobs (overrides TASKDESK_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("server=info".parse()?)
                .add_directive("board=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::default();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    info!(
        addr = %config.bind_addr(),
        data_dir = %config.data_dir.display(),
        "Starting Taskdesk API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let state = ServerState::new(config).await?;
    run_server(state).await
}
