//! Energy-saving recommendation service
//!
//! Axum REST API returning personalized energy-saving tips based on the
//! consumption profile reported by the usage simulation service. Uses
//! AI-generated tips when a credential is configured, rule-based tips
//! otherwise; every external dependency failure degrades to a safe
//! rule-based answer.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use wattwise_core::ai::{AiBackend, AiClient};
use wattwise_core::config::RecommendConfig;
use wattwise_core::context::SimilarityIndex;
use wattwise_core::usage_client::UsageClient;

mod handlers;


/// Shared application state
pub struct AppState {
    pub config: RecommendConfig,
    /// None when no credential is configured; requests then take the
    /// rule-based path
    pub ai: Option<AiClient>,
    pub usage: UsageClient,
    /// Lazily-built context-tip index for prompt enrichment
    pub similarity: SimilarityIndex,
}

/// Create the application router
pub fn create_router(config: RecommendConfig) -> Router {
    let ai = AiClient::from_config(&config);
    match &ai {
        Some(client) => info!(
            "AI backend configured: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => info!("AI backend not configured (set OPENAI_API_KEY to enable generated tips)"),
    }

    let usage = UsageClient::new(&config.usage_api);
    info!("usage service: {}", usage.host());

    let state = Arc::new(AppState {
        config,
        ai,
        usage,
        similarity: SimilarityIndex::new(),
    });

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/tips", post(handlers::tips))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(config: RecommendConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("recommendation-api listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
