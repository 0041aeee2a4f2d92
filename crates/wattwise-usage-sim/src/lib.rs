//! Usage simulation service
//!
//! Axum REST API serving synthetic energy consumption data:
//! - `/simulate`: hourly or daily dummy consumption values
//! - `/stats`: basic statistics (avg/min/max) over N days
//!
//! These are simulated values, not real meter readings.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use wattwise_core::simulate::{generate_hourly, to_daily, to_stats, DEFAULT_SEED};


/// Query parameters for `/simulate`
#[derive(Debug, Deserialize)]
pub struct SimulateQuery {
    #[serde(default = "default_granularity")]
    pub granularity: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

/// Query parameters for `/stats`
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_granularity() -> String {
    "hour".to_string()
}

fn default_days() -> u32 {
    7
}

/// GET / - service metadata
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "usage-sim-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Simulation API for energy usage data",
        "endpoints": {
            "/simulate": "GET - simulated consumption values",
            "/stats": "GET - basic statistics over N days",
        },
        "note": "Simulated data, not real meter readings.",
    }))
}

/// GET /simulate - hourly or daily consumption values
async fn simulate(Query(params): Query<SimulateQuery>) -> Result<Response, AppError> {
    if params.granularity != "hour" && params.granularity != "day" {
        return Err(AppError::bad_request("granularity must be 'hour' or 'day'"));
    }

    let readings = generate_hourly(DEFAULT_SEED, params.days);
    if params.granularity == "day" {
        Ok(Json(to_daily(&readings)).into_response())
    } else {
        Ok(Json(readings).into_response())
    }
}

/// GET /stats - avg/min/max over the hourly values of the last N days
async fn stats(Query(params): Query<StatsQuery>) -> Result<Response, AppError> {
    if params.days < 1 {
        return Err(AppError::bad_request("days must be at least 1"));
    }

    let readings = generate_hourly(DEFAULT_SEED, params.days);
    let stats = to_stats(params.days, &readings)?;
    Ok(Json(stats).into_response())
}

/// Create the application router
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/simulate", get(simulate))
        .route("/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the server
pub async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router();

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("usage-sim-api listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
