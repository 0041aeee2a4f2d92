//! HTTP client for the usage simulation service

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Upstream call timeout. A timed-out call counts as "no data".
const STATS_TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregate statistics as reported by the usage service.
///
/// All fields are optional so a structurally valid but incomplete body can
/// be told apart from a transport failure.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamStats {
    pub days: Option<u32>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

/// Client for `GET /stats` on the usage simulation service
#[derive(Clone)]
pub struct UsageClient {
    http_client: Client,
    base_url: String,
}

impl UsageClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// Fetch aggregate stats for the given day count.
    ///
    /// Typed errors distinguish transport failures, non-2xx status and
    /// malformed bodies; callers that only care about presence use
    /// [`UsageClient::average`].
    pub async fn fetch_stats(&self, days: u32) -> Result<UpstreamStats> {
        let response = self
            .http_client
            .get(format!("{}/stats", self.base_url))
            .query(&[("days", days)])
            .timeout(STATS_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::UpstreamStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse(e.to_string()))
    }

    /// Average consumption for the given day count, or `None` when the
    /// service is unreachable, errors, or omits the field. Never raises.
    pub async fn average(&self, days: u32) -> Option<f64> {
        match self.fetch_stats(days).await {
            Ok(stats) => {
                if stats.avg.is_none() {
                    warn!(host = %self.base_url, "usage stats response missing 'avg' field");
                }
                stats.avg
            }
            Err(e) => {
                warn!(host = %self.base_url, error = %e, "failed to fetch usage stats");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockUsageServer;

    #[tokio::test]
    async fn test_average_from_healthy_upstream() {
        let server = MockUsageServer::start(0.52).await;
        let client = UsageClient::new(&server.url());

        assert_eq!(client.average(7).await, Some(0.52));
    }

    #[tokio::test]
    async fn test_average_unreachable_is_none() {
        // Port 9 (discard) is never serving HTTP.
        let client = UsageClient::new("http://127.0.0.1:9");
        assert_eq!(client.average(7).await, None);
    }

    #[tokio::test]
    async fn test_average_error_status_is_none() {
        let server = MockUsageServer::failing().await;
        let client = UsageClient::new(&server.url());

        assert_eq!(client.average(7).await, None);
    }

    #[tokio::test]
    async fn test_average_missing_field_is_none() {
        let server = MockUsageServer::missing_avg().await;
        let client = UsageClient::new(&server.url());

        assert_eq!(client.average(7).await, None);
    }

    #[tokio::test]
    async fn test_fetch_stats_typed_errors() {
        let server = MockUsageServer::failing().await;
        let client = UsageClient::new(&server.url());

        match client.fetch_stats(7).await {
            Err(Error::UpstreamStatus(code)) => assert_eq!(code, 500),
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }
}
