//! OpenAI-compatible backend implementation
//!
//! Works with api.openai.com and any server implementing the OpenAI chat
//! completions and embeddings APIs (vLLM, LocalAI, llama-server, ...).
//! The base URL is configurable so tests can point it at an in-process
//! mock server.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecommendConfig;
use crate::error::{Error, Result};

use super::prompt::TipPrompt;
use super::AiBackend;

use async_trait::async_trait;

/// Sampling temperature with safe mode on
const SAFE_TEMPERATURE: f64 = 0.2;
/// Sampling temperature with safe mode off
const DEFAULT_TEMPERATURE: f64 = 0.5;
/// Response length cap for generated tips
const MAX_COMPLETION_TOKENS: u32 = 300;

/// Per-call timeout. A timed-out call is a failure like any other, the
/// caller degrades to rule-based tips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-compatible backend for tip generation and embeddings
#[derive(Clone)]
pub struct OpenAiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    embed_model: String,
    api_key: String,
    safe_mode: bool,
}

impl OpenAiBackend {
    pub fn new(
        base_url: &str,
        model: &str,
        embed_model: &str,
        api_key: &str,
        safe_mode: bool,
    ) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            embed_model: embed_model.to_string(),
            api_key: api_key.to_string(),
            safe_mode,
        }
    }

    /// Create from the service configuration.
    ///
    /// Returns None when no API key is configured.
    pub fn from_config(config: &RecommendConfig) -> Option<Self> {
        let api_key = config.openai_api_key.as_deref()?;
        Some(Self::new(
            &config.openai_base_url,
            &config.openai_model,
            &config.openai_embed_model,
            api_key,
            config.safe_mode,
        ))
    }

    fn temperature(&self) -> f64 {
        if self.safe_mode {
            SAFE_TEMPERATURE
        } else {
            DEFAULT_TEMPERATURE
        }
    }
}

/// Request to the chat completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Request to the embeddings API
#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: String,
}

/// Response from the embeddings API
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl AiBackend for OpenAiBackend {
    async fn generate_tips(&self, prompt: &TipPrompt) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system_message().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user_message(),
                },
            ],
            temperature: self.temperature(),
            max_tokens: MAX_COMPLETION_TOKENS,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            debug!(status, body = %body, "chat completion request failed");
            return Err(Error::UpstreamStatus(status));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!("chat completion response received");

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::MalformedResponse("no choices in completion response".into()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingsRequest {
            model: self.embed_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .http_client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::UpstreamStatus(response.status().as_u16()));
        }

        let embeddings: EmbeddingsResponse = response.json().await?;

        embeddings
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::MalformedResponse("no data in embeddings response".into()))
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConsumptionClass;
    use crate::test_utils::MockOpenAiServer;

    fn backend_for(server: &MockOpenAiServer, safe_mode: bool) -> OpenAiBackend {
        OpenAiBackend::new(
            &server.url(),
            "gpt-4o-mini",
            "text-embedding-3-small",
            "test-key",
            safe_mode,
        )
    }

    #[tokio::test]
    async fn test_generate_tips_returns_completion() {
        let server = MockOpenAiServer::start().await;
        let backend = backend_for(&server, true);

        let prompt = TipPrompt::new(0.52, ConsumptionClass::Normal, 5, vec!["de".to_string()]);
        let text = backend.generate_tips(&prompt).await.unwrap();
        assert!(text.contains("Energiespartipps") || !text.is_empty());
    }

    #[tokio::test]
    async fn test_generate_tips_canned_completion() {
        let server = MockOpenAiServer::start_with_completion("Nur ein Tipp.").await;
        let backend = backend_for(&server, true);

        let prompt = TipPrompt::new(0.9, ConsumptionClass::High, 5, vec!["de".to_string()]);
        let text = backend.generate_tips(&prompt).await.unwrap();
        assert_eq!(text, "Nur ein Tipp.");
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let server = MockOpenAiServer::start().await;
        let backend = backend_for(&server, true);

        let vector = backend.embed("Energie sparen").await.unwrap();
        assert!(!vector.is_empty());
    }

    #[tokio::test]
    async fn test_health_check_against_mock() {
        let server = MockOpenAiServer::start().await;
        let backend = backend_for(&server, true);
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAiBackend::new(
            "http://127.0.0.1:9",
            "gpt-4o-mini",
            "text-embedding-3-small",
            "test-key",
            true,
        );
        assert!(!backend.health_check().await);
    }

    #[test]
    fn test_temperature_follows_safe_mode() {
        let safe = OpenAiBackend::new("http://localhost", "m", "e", "k", true);
        let fast = OpenAiBackend::new("http://localhost", "m", "e", "k", false);
        assert_eq!(safe.temperature(), 0.2);
        assert_eq!(fast.temperature(), 0.5);
    }
}
