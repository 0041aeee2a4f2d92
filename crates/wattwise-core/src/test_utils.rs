//! Test utilities for wattwise-core
//!
//! In-process mock servers for the two upstream dependencies: an
//! OpenAI-compatible API (chat completions + embeddings) and the
//! usage-stats service. Used by unit tests here and by the service crates'
//! integration tests via the `test-utils` feature.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

// ---------------------------------------------------------------------------
// Mock OpenAI-compatible server
// ---------------------------------------------------------------------------

/// Mock OpenAI-compatible server for testing
pub struct MockOpenAiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone)]
struct OpenAiMockState {
    completion: String,
    embeddings_ok: bool,
}

impl MockOpenAiServer {
    /// Start with a default (safe) German completion
    pub async fn start() -> Self {
        Self::start_with_completion(
            "Hier sind Ihre Energiespartipps:\n\
             1. Schalten Sie Standby-Geräte nachts aus.\n\
             2. Nutzen Sie LED-Beleuchtung.\n\
             3. Waschen Sie nur mit voller Maschine.",
        )
        .await
    }

    /// Start with a fixed completion text (e.g. one containing a banned
    /// term, to exercise the safety filter)
    pub async fn start_with_completion(completion: &str) -> Self {
        Self::start_inner(completion, true).await
    }

    /// Start with a fixed completion but a failing embeddings endpoint,
    /// to exercise the context-free generation path
    pub async fn start_without_embeddings(completion: &str) -> Self {
        Self::start_inner(completion, false).await
    }

    async fn start_inner(completion: &str, embeddings_ok: bool) -> Self {
        let state = OpenAiMockState {
            completion: completion.to_string(),
            embeddings_ok,
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/embeddings", post(handle_embeddings))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenAiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        data: vec![ModelEntry {
            id: "gpt-4o-mini".to_string(),
        }],
    })
}

async fn handle_chat(
    State(state): State<OpenAiMockState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(ChatResponse {
        model: request.model,
        choices: vec![ChatChoice {
            message: ChatChoiceMessage {
                role: "assistant".to_string(),
                content: state.completion.clone(),
            },
        }],
    })
}

/// Deterministic toy embedding keyed off the input bytes
async fn handle_embeddings(
    State(state): State<OpenAiMockState>,
    Json(request): Json<EmbeddingsRequest>,
) -> Result<Json<EmbeddingsResponse>, StatusCode> {
    if !state.embeddings_ok {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let bytes = request.input.as_bytes();
    let embedding: Vec<f32> = (0..8)
        .map(|i| {
            bytes
                .iter()
                .enumerate()
                .map(|(j, b)| *b as f32 * ((i + j) as f32 * 0.37).sin())
                .sum::<f32>()
        })
        .collect();

    Ok(Json(EmbeddingsResponse {
        data: vec![EmbeddingEntry { embedding }],
    }))
}

// Request/Response types for the OpenAI mock

#[derive(Debug, Serialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    #[allow(dead_code)]
    messages: Vec<ChatRequestMessage>,
    #[allow(dead_code)]
    temperature: f64,
    #[allow(dead_code)]
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatRequestMessage {
    #[allow(dead_code)]
    role: String,
    #[allow(dead_code)]
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Serialize)]
struct ChatChoiceMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsRequest {
    #[allow(dead_code)]
    model: String,
    input: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Serialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

// ---------------------------------------------------------------------------
// Mock usage-stats server
// ---------------------------------------------------------------------------

/// Behavior of the mock usage-stats endpoint
#[derive(Clone)]
enum UsageMockMode {
    Fixed(f64),
    Failing,
    MissingAvg,
}

/// Mock usage simulation service for testing
pub struct MockUsageServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUsageServer {
    /// Serve `/stats` with a fixed average
    pub async fn start(avg: f64) -> Self {
        Self::start_mode(UsageMockMode::Fixed(avg)).await
    }

    /// Serve `/stats` with a 500 error
    pub async fn failing() -> Self {
        Self::start_mode(UsageMockMode::Failing).await
    }

    /// Serve `/stats` with a body that omits the `avg` field
    pub async fn missing_avg() -> Self {
        Self::start_mode(UsageMockMode::MissingAvg).await
    }

    async fn start_mode(mode: UsageMockMode) -> Self {
        let app = Router::new()
            .route("/stats", get(handle_stats))
            .with_state(mode);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockUsageServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_stats(
    State(mode): State<UsageMockMode>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match mode {
        UsageMockMode::Fixed(avg) => Ok(Json(serde_json::json!({
            "days": 7,
            "avg": avg,
            "max": avg + 0.3,
            "min": avg - 0.3,
        }))),
        UsageMockMode::Failing => Err(StatusCode::INTERNAL_SERVER_ERROR),
        UsageMockMode::MissingAvg => Ok(Json(serde_json::json!({ "days": 7 }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiBackend, OpenAiBackend};

    #[tokio::test]
    async fn test_mock_openai_health_check() {
        let server = MockOpenAiServer::start().await;
        let backend = OpenAiBackend::new(&server.url(), "gpt-4o-mini", "embed", "key", true);
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_embeddings_deterministic() {
        let server = MockOpenAiServer::start().await;
        let backend = OpenAiBackend::new(&server.url(), "gpt-4o-mini", "embed", "key", true);

        let a = backend.embed("gleicher Text").await.unwrap();
        let b = backend.embed("gleicher Text").await.unwrap();
        let c = backend.embed("anderer Text").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_mock_usage_server_fixed() {
        let server = MockUsageServer::start(0.9).await;
        let body: serde_json::Value = reqwest::get(format!("{}/stats?days=7", server.url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["avg"], 0.9);
    }
}
