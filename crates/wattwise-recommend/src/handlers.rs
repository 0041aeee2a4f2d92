//! HTTP request handlers
//!
//! The `/tips` handler sequences the whole pipeline: fetch the average,
//! classify, try AI generation (with context retrieval and safety
//! filtering), and fall back to the rule-based catalog on any failure.
//! Nothing in here is fatal; every degraded path still returns a complete
//! response.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use wattwise_core::ai::{AiBackend, AiClient, TipPrompt};
use wattwise_core::classify::ConsumptionClass;
use wattwise_core::safety::filter_text;
use wattwise_core::tips::rule_based_tips;

use crate::AppState;

/// Average assumed when the usage service has no data
const PLACEHOLDER_AVERAGE: f64 = 0.7;

/// Notice attached to responses built without real usage data
const NO_DATA_MESSAGE: &str =
    "Keine genauen Verbrauchsdaten verfügbar. Hier sind allgemeine Energiespartipps.";

/// Request body for `/tips`
#[derive(Debug, Deserialize)]
pub struct TipsRequest {
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_max_tips")]
    pub max_tips: usize,
    /// Accepted for API compatibility; output is always German
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

fn default_days() -> u32 {
    7
}

fn default_max_tips() -> usize {
    5
}

fn default_languages() -> Vec<String> {
    vec!["de".to_string()]
}

/// Where the returned tips came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TipSource {
    /// Rule-based catalog on a real average
    RuleBased,
    /// Rule-based catalog on the placeholder average (usage data missing)
    RuleBasedFallback,
    /// Generated text, no context snippets
    AiGenerated,
    /// Generated text enriched with similarity-retrieved context
    AiEnhanced,
    /// Generated text was blocked by the safety filter and replaced
    AiFallback,
}

/// Response payload for `/tips`
#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub source: TipSource,
    pub classification: ConsumptionClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips_text: Option<String>,
    pub language: String,
    pub average_consumption: f64,
    pub safety_filter_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TipsResponse {
    fn rule_based(
        source: TipSource,
        classification: ConsumptionClass,
        avg: f64,
        max_tips: usize,
        safety_filter_active: bool,
        message: Option<String>,
    ) -> Self {
        Self {
            source,
            classification,
            tips: Some(rule_based_tips(classification, max_tips)),
            tips_text: None,
            language: "de".to_string(),
            average_consumption: avg,
            safety_filter_active,
            message,
        }
    }
}

/// POST /tips - personalized energy-saving tips
///
/// Uses AI-generated tips when a credential is configured, rule-based
/// tips otherwise. Single attempt per external call, no retries.
pub async fn tips(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TipsRequest>,
) -> Json<TipsResponse> {
    let avg = state.usage.average(req.days).await;

    // No usage data at all: general tips on a placeholder average.
    let Some(avg) = avg else {
        let classification =
            ConsumptionClass::classify(Some(PLACEHOLDER_AVERAGE), &state.config.thresholds);
        return Json(TipsResponse::rule_based(
            TipSource::RuleBasedFallback,
            classification,
            PLACEHOLDER_AVERAGE,
            req.max_tips,
            false,
            Some(NO_DATA_MESSAGE.to_string()),
        ));
    };

    let classification = ConsumptionClass::classify(Some(avg), &state.config.thresholds);

    if let Some(ref ai) = state.ai {
        if let Some(response) = generate_ai_tips(&state, ai, avg, classification, &req).await {
            return Json(response);
        }
    }

    // AI unavailable or failed: rule-based tips on the real average.
    Json(TipsResponse::rule_based(
        TipSource::RuleBased,
        classification,
        avg,
        req.max_tips,
        true,
        None,
    ))
}

/// Attempt the AI path. Returns None on any failure so the caller can
/// degrade to rule-based tips.
async fn generate_ai_tips(
    state: &AppState,
    ai: &AiClient,
    avg: f64,
    classification: ConsumptionClass,
    req: &TipsRequest,
) -> Option<TipsResponse> {
    // Context retrieval is best-effort; generation proceeds without it.
    let context = match state.similarity.retrieve(ai, classification).await {
        Ok(snippets) => snippets,
        Err(e) => {
            warn!(error = %e, "context retrieval failed, generating without context");
            Vec::new()
        }
    };
    let context_used = !context.is_empty();

    let prompt = TipPrompt::new(avg, classification, req.max_tips, req.languages.clone())
        .with_context(context);

    let text = match ai.generate_tips(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "tip generation failed, falling back to rule-based tips");
            return None;
        }
    };

    let (text, replaced) = filter_text(text);
    let source = if replaced {
        TipSource::AiFallback
    } else if context_used {
        TipSource::AiEnhanced
    } else {
        TipSource::AiGenerated
    };

    Some(TipsResponse {
        source,
        classification,
        tips: None,
        tips_text: Some(text),
        language: "de".to_string(),
        average_consumption: avg,
        safety_filter_active: true,
        message: None,
    })
}

/// GET / - service metadata
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "recommendation-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "API for personalized energy-saving tips",
        "endpoints": {
            "/tips": "POST - request energy-saving tips",
            "/health": "GET - service health",
        },
        "default_language": state.config.default_language,
    }))
}

/// GET /health - service health and feature availability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "ai_available": state.ai.is_some(),
        "safe_mode": state.config.safe_mode,
        "embeddings_available": state.ai.is_some(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_source_serialization() {
        let json = |s: TipSource| serde_json::to_string(&s).unwrap();
        assert_eq!(json(TipSource::RuleBased), "\"rule-based\"");
        assert_eq!(json(TipSource::RuleBasedFallback), "\"rule-based-fallback\"");
        assert_eq!(json(TipSource::AiGenerated), "\"ai-generated\"");
        assert_eq!(json(TipSource::AiEnhanced), "\"ai-enhanced\"");
        assert_eq!(json(TipSource::AiFallback), "\"ai-fallback\"");
    }

    #[test]
    fn test_rule_based_response_shape() {
        let response = TipsResponse::rule_based(
            TipSource::RuleBased,
            ConsumptionClass::Normal,
            0.52,
            5,
            true,
            None,
        );

        assert_eq!(response.tips.as_ref().unwrap().len(), 5);
        assert!(response.tips_text.is_none());
        assert_eq!(response.language, "de");
    }
}
