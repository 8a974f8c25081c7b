//! HTTP client for the platform report endpoint.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::types::RunReport;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the gauntlet platform API.
///
/// Holds the base URL and the bearer credential; every call is a single
/// request/response round trip.
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Bearer token sent with every request.
    api_key: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://platform.example.com/api")
    /// * `api_key` - bearer token for the `Authorization` header
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Submit a finished run report.
    ///
    /// POSTs the report as JSON to `{base}/runs/{run_id}/report`.
    /// Non-success statuses are returned as [`ApiError::Status`].
    pub async fn submit_report(&self, report: &RunReport) -> ApiResult<()> {
        let url = format!("{}/runs/{}/report", self.base_url, report.run_id);
        debug!(url = %url, "Submitting run report");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(report)
            .send()
            .await
            .map_err(|e| ApiError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(run_id = %report.run_id, "Run report submitted");
        Ok(())
    }
}
