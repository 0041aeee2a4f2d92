//! recommendation-api - energy-saving tips service
//!
//! Usage:
//!   recommendation-api                Serve on API_HOST:API_PORT (env)
//!   recommendation-api --port 8080   Override the port
//!   recommendation-api --verbose     Debug logging
//!
//! AI-generated tips require OPENAI_API_KEY; without it every request is
//! answered from the rule-based catalog.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wattwise_core::config::RecommendConfig;

#[derive(Parser)]
#[command(
    name = "recommendation-api",
    about = "API for personalized energy-saving tips"
)]
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

    let mut config = RecommendConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!("usage service: {}", config.usage_api);
    info!(
        "AI mode: {}",
        if config.openai_api_key.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    info!("safe mode: {}", config.safe_mode);
    info!("default language: {}", config.default_language);

    wattwise_recommend::serve(config).await
}
