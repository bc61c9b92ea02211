//! Highlight provider client implementation.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{HighlightError, HighlightResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the highlight provider client.
#[derive(Debug, Clone)]
pub struct HighlightApiConfig {
    /// Provider endpoint URL
    pub endpoint: String,
    /// RapidAPI key sent in the request headers
    pub api_key: String,
    /// RapidAPI host header value
    pub api_host: String,
    /// Request timeout
    pub timeout: Duration,
}

impl HighlightApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> HighlightResult<Self> {
        Ok(Self {
            endpoint: std::env::var("RAPIDAPI_URL").unwrap_or_else(|_| {
                "https://api.sportsdata.io/v3/sports/highlights".to_string()
            }),
            api_key: std::env::var("RAPIDAPI_KEY")
                .map_err(|_| HighlightError::config_error("RAPIDAPI_KEY not set"))?,
            api_host: std::env::var("RAPIDAPI_HOST").unwrap_or_default(),
            timeout: Duration::from_secs(
                std::env::var("FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Client for the highlight provider HTTP API.
#[derive(Debug, Clone)]
pub struct HighlightClient {
    http: reqwest::Client,
    config: HighlightApiConfig,
}

impl HighlightClient {
    /// Create a new client from configuration.
    pub fn new(config: HighlightApiConfig) -> HighlightResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> HighlightResult<Self> {
        Self::new(HighlightApiConfig::from_env()?)
    }

    /// Fetch highlight metadata for a league and date.
    ///
    /// Issues one GET with provider credentials and `{league, date}` query
    /// parameters; the JSON body is returned verbatim, whatever its shape.
    /// No retry.
    pub async fn fetch(&self, league: &str, date: &str) -> HighlightResult<Value> {
        info!("Requesting highlights for {} {}", league, date);

        let response = self
            .http
            .get(&self.config.endpoint)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .query(&[("league", league), ("date", date)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HighlightError::Status(status.as_u16()));
        }

        let doc = response
            .json::<Value>()
            .await
            .map_err(|e| HighlightError::InvalidJson(e.to_string()))?;

        debug!("Received highlight document for {} {}", league, date);
        Ok(doc)
    }
}
