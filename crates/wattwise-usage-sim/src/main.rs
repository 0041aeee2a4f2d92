//! usage-sim-api - synthetic energy usage service
//!
//! Usage:
//!   usage-sim-api                     Serve on API_HOST:API_PORT (env)
//!   usage-sim-api --port 8001        Override the port
//!   usage-sim-api --verbose          Debug logging

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wattwise_core::config::UsageSimConfig;

#[derive(Parser)]
#[command(name = "usage-sim-api", about = "Simulation API for energy usage data")]
struct Cli {
    /// Host to bind (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = UsageSimConfig::from_env();
    let host = cli.host.unwrap_or(config.host);
    let port = cli.port.unwrap_or(config.port);

    wattwise_usage_sim::serve(&host, port).await
}
