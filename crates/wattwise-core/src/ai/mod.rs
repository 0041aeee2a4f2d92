//! Pluggable AI backend abstraction
//!
//! Backend-agnostic interface for the tip-generation and embedding calls.
//!
//! # Architecture
//!
//! - `AiBackend` trait: defines the interface for generation and embeddings
//! - `AiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAiBackend`, `MockBackend`
//!
//! The recommendation service holds an `Option<AiClient>`; `None` (no
//! credential configured) simply means every request takes the rule-based
//! path.

mod mock;
mod openai;
mod prompt;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use prompt::TipPrompt;

use async_trait::async_trait;

use crate::config::RecommendConfig;
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends are Send + Sync so they can be shared across request tasks.
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Generate free-form tip text for the given prompt
    async fn generate_tips(&self, prompt: &TipPrompt) -> Result<String>;

    /// Embed a text into a dense vector (for similarity retrieval)
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model name (for logging and metadata)
    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AiClient {
    /// OpenAI-compatible chat completions + embeddings API
    OpenAi(OpenAiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AiClient {
    /// Create an AI client from the service configuration.
    ///
    /// Returns None when no credential is configured - the caller degrades
    /// to rule-based tips.
    pub fn from_config(config: &RecommendConfig) -> Option<Self> {
        OpenAiBackend::from_config(config).map(AiClient::OpenAi)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AiBackend for AiClient {
    async fn generate_tips(&self, prompt: &TipPrompt) -> Result<String> {
        match self {
            AiClient::OpenAi(b) => b.generate_tips(prompt).await,
            AiClient::Mock(b) => b.generate_tips(prompt).await,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            AiClient::OpenAi(b) => b.embed(text).await,
            AiClient::Mock(b) => b.embed(text).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::OpenAi(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::OpenAi(b) => b.model(),
            AiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AiClient::OpenAi(b) => b.host(),
            AiClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConsumptionClass;

    #[test]
    fn test_ai_client_mock() {
        let client = AiClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AiClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_generates_german_text() {
        let client = AiClient::mock();
        let prompt = TipPrompt::new(0.5, ConsumptionClass::Normal, 5, vec!["de".to_string()]);
        let text = client.generate_tips(&prompt).await.unwrap();
        assert!(!text.is_empty());
    }

    #[test]
    fn test_from_config_without_credential() {
        let config = RecommendConfig {
            usage_api: "http://localhost:8000".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            openai_embed_model: "text-embedding-3-small".to_string(),
            safe_mode: true,
            default_language: "de".to_string(),
            thresholds: crate::classify::Thresholds::default(),
            host: "0.0.0.0".to_string(),
            port: 8000,
        };
        assert!(AiClient::from_config(&config).is_none());
    }
}
