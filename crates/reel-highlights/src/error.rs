//! Highlight client error types.

use thiserror::Error;

/// Result type for highlight provider operations.
pub type HighlightResult<T> = Result<T, HighlightError>;

/// Errors that can occur while fetching highlight metadata.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("Failed to configure highlight client: {0}")]
    ConfigError(String),

    #[error("Highlight request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Highlight provider returned status {0}")]
    Status(u16),

    #[error("Highlight response was not valid JSON: {0}")]
    InvalidJson(String),
}

impl HighlightError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
