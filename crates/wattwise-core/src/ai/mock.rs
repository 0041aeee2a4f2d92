//! Mock backend for testing
//!
//! Returns predictable German tip text and deterministic embeddings
//! without any network calls. Generation and embedding can be made to fail
//! to exercise the degradation paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::prompt::TipPrompt;
use super::AiBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Canned generation output; a default text is produced when unset
    response: Option<String>,
    /// Make generate_tips/embed fail, to test fallback behavior
    failing: bool,
    embed_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: None,
            failing: false,
            embed_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Mock whose generation and embedding calls fail
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    /// Fix the generation output for a test
    pub fn with_response(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            ..Self::new()
        }
    }

    /// Number of embed() calls made so far (for single-initialization tests)
    pub fn embed_call_count(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }
}

/// Deterministic toy embedding: stable per input, distinct across inputs.
fn pseudo_embedding(text: &str) -> Vec<f32> {
    let bytes = text.as_bytes();
    (0..8)
        .map(|i| {
            bytes
                .iter()
                .enumerate()
                .map(|(j, b)| *b as f32 * ((i + j) as f32 * 0.37).sin())
                .sum::<f32>()
        })
        .collect()
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn generate_tips(&self, prompt: &TipPrompt) -> Result<String> {
        if self.failing {
            return Err(Error::MalformedResponse("mock generation failure".into()));
        }

        if let Some(ref canned) = self.response {
            return Ok(canned.clone());
        }

        Ok(format!(
            "1. Schalten Sie Standby-Geräte vollständig aus.\n\
             2. Nutzen Sie LED-Beleuchtung statt Glühlampen.\n\
             3. Betreiben Sie Großgeräte nur voll beladen. \
             (Durchschnitt: {} kWh)",
            prompt.average_kwh
        ))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::MalformedResponse("mock embedding failure".into()));
        }
        Ok(pseudo_embedding(text))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConsumptionClass;

    #[tokio::test]
    async fn test_canned_response() {
        let backend = MockBackend::with_response("Fester Text.");
        let prompt = TipPrompt::new(0.5, ConsumptionClass::Normal, 5, vec!["de".to_string()]);
        assert_eq!(backend.generate_tips(&prompt).await.unwrap(), "Fester Text.");
    }

    #[tokio::test]
    async fn test_failing_backend() {
        let backend = MockBackend::failing();
        let prompt = TipPrompt::new(0.5, ConsumptionClass::Normal, 5, vec!["de".to_string()]);
        assert!(backend.generate_tips(&prompt).await.is_err());
        assert!(backend.embed("x").await.is_err());
    }

    #[tokio::test]
    async fn test_embeddings_are_deterministic_and_distinct() {
        let backend = MockBackend::new();
        let a1 = backend.embed("hoher Verbrauch").await.unwrap();
        let a2 = backend.embed("hoher Verbrauch").await.unwrap();
        let b = backend.embed("niedriger Verbrauch").await.unwrap();

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(backend.embed_call_count(), 3);
    }
}
