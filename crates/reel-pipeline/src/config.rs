//! Pipeline configuration.

use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_LEAGUE: &str = "nba";
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Pipeline configuration.
///
/// Required variables fail fast at startup, before any external call; the
/// client crates read their own credentials and endpoints the same way.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// League identifier used in provider queries and storage keys
    pub league: String,
    /// Bucket for the raw highlight JSON
    pub metadata_bucket: String,
    /// Bucket for source videos and transcode output
    pub videos_bucket: String,
    /// Bucket for run logs
    pub logs_bucket: String,
    /// Video relay transfer timeout
    pub download_timeout: Duration,
    /// Exit non-zero when a run fails, so a supervisor can alert or retry.
    /// Off by default: a failed run is logged, not raised.
    pub exit_on_failure: bool,
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Ok(Self {
            league: std::env::var("LEAGUE").unwrap_or_else(|_| DEFAULT_LEAGUE.to_string()),
            metadata_bucket: required("S3_METADATA_BUCKET")?,
            videos_bucket: required("S3_VIDEOS_BUCKET")?,
            logs_bucket: required("S3_LOGS_BUCKET")?,
            download_timeout: Duration::from_secs(
                std::env::var("DOWNLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            ),
            exit_on_failure: std::env::var("PIPELINE_EXIT_ON_FAILURE")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        })
    }
}

fn required(name: &str) -> PipelineResult<String> {
    std::env::var(name).map_err(|_| PipelineError::config(format!("{} not set", name)))
}
