//! HTTP client for the latest-entry endpoint
//!
//! The prediction command reads its input from `GET /api/latest-entry` on a
//! running Heartwatch server (or anything that serves the same shape).

use crate::domain::{PredictionError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;

/// Source of the aggregated latest-entry payload
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch the payload as raw JSON
    ///
    /// # Errors
    ///
    /// Transport failures map to `PredictionError::ConnectionFailed`,
    /// `Timeout` or `HttpStatus`; a body that is not JSON is
    /// `MalformedPayload`.
    async fn fetch_latest(&self) -> Result<Value>;

    /// Where the payload comes from, for diagnostics
    fn describe(&self) -> String;
}

/// Fetches the latest entry over HTTP with a fixed timeout and no retries
pub struct LatestEntryClient {
    client: Client,
    url: String,
    timeout_seconds: u64,
}

impl LatestEntryClient {
    /// Create a client for `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let url = url.into();
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_seconds))
            .connect_timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| PredictionError::ConnectionFailed {
                url: url.clone(),
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url,
            timeout_seconds,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_send_error(&self, e: reqwest::Error) -> PredictionError {
        if e.is_timeout() {
            PredictionError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else {
            PredictionError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl EntrySource for LatestEntryClient {
    async fn fetch_latest(&self) -> Result<Value> {
        tracing::info!(url = %self.url, timeout_seconds = self.timeout_seconds, "Fetching latest entry");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Latest-entry request failed");
            return Err(PredictionError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;
        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            PredictionError::MalformedPayload(format!("response is not valid JSON: {e}"))
        })?;

        tracing::debug!("Latest entry fetched");
        Ok(payload)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
