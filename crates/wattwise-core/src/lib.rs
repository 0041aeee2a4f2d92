//! wattwise Core Library
//!
//! Shared functionality for the wattwise energy services:
//! - Synthetic consumption series generator and aggregate statistics
//! - Consumption classification against configurable thresholds
//! - Rule-based German tip catalog
//! - Safety filter for generated tip text
//! - HTTP client for the usage simulation service
//! - Pluggable AI backends (OpenAI-compatible, mock) for tip generation
//!   and embeddings
//! - Similarity index over a fixed context-tip catalog

pub mod ai;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod safety;
pub mod simulate;
pub mod tips;
pub mod usage_client;

/// Test utilities including the mock OpenAI and usage-stats servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AiBackend, AiClient, MockBackend, OpenAiBackend, TipPrompt};
pub use classify::{ConsumptionClass, Thresholds};
pub use config::{RecommendConfig, UsageSimConfig};
pub use context::{SimilarityIndex, CONTEXT_TIPS, MAX_CONTEXT_SNIPPETS};
pub use error::{Error, Result};
pub use safety::{filter_text, screen, ScreenOutcome, SAFE_FALLBACK_TEXT};
pub use simulate::{
    generate_hourly, round3, to_daily, to_stats, DailyTotal, HourlyReading, UsageStats,
    DEFAULT_SEED,
};
pub use tips::{rule_based_tips, BASE_TIPS, TIP_CEILING};
pub use usage_client::{UpstreamStats, UsageClient};
