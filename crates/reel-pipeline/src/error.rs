//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can abort a pipeline run.
///
/// Everything except `Config` is caught at the run boundary, logged, and
/// written to the day's log object. `Config` is raised before any external
/// call and fails the process immediately.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Highlight fetch failed: {0}")]
    Fetch(#[from] reel_highlights::HighlightError),

    #[error("Video download failed: {0}")]
    Download(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(#[from] reel_storage::StorageError),

    #[error("Transcode submission failed: {0}")]
    Submit(#[from] reel_transcode::TranscodeError),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }
}
