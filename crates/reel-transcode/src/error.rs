//! Transcode client error types.

use thiserror::Error;

/// Result type for transcode operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// Errors that can occur during transcode job submission.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to configure transcode client: {0}")]
    ConfigError(String),

    #[error("Endpoint discovery failed: {0}")]
    EndpointDiscovery(String),

    #[error("Job submission failed: {0}")]
    SubmitFailed(String),
}

impl TranscodeError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn endpoint_discovery(msg: impl Into<String>) -> Self {
        Self::EndpointDiscovery(msg.into())
    }

    pub fn submit_failed(msg: impl Into<String>) -> Self {
        Self::SubmitFailed(msg.into())
    }
}
