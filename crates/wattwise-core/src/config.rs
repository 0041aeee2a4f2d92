//! Environment-sourced configuration for both services

use std::env;

use crate::classify::Thresholds;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Settings for the usage simulation service
#[derive(Debug, Clone)]
pub struct UsageSimConfig {
    pub host: String,
    pub port: u16,
}

impl UsageSimConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("API_HOST", "0.0.0.0"),
            port: env_parse("API_PORT", 8000),
        }
    }
}

/// Settings for the recommendation service
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Base URL of the usage simulation service
    pub usage_api: String,
    /// OpenAI credential; AI generation is disabled when absent
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_embed_model: String,
    /// Lowers the sampling temperature for generated tips
    pub safe_mode: bool,
    pub default_language: String,
    pub thresholds: Thresholds,
    pub host: String,
    pub port: u16,
}

impl RecommendConfig {
    pub fn from_env() -> Self {
        let defaults = Thresholds::default();
        Self {
            usage_api: env_or("USAGE_API", "http://usage-sim-api:8000"),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com"),
            openai_embed_model: env_or("OPENAI_EMBED_MODEL", "text-embedding-3-small"),
            safe_mode: env_or("AI_SAFE_MODE", "true").to_lowercase() == "true",
            default_language: env_or("DEFAULT_LANGUAGE", "de"),
            thresholds: Thresholds {
                low: env_parse("LOW_THRESHOLD", defaults.low),
                high: env_parse("HIGH_THRESHOLD", defaults.high),
            },
            host: env_or("API_HOST", "0.0.0.0"),
            port: env_parse("API_PORT", 8000),
        }
    }
}
