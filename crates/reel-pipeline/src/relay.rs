//! Streaming video relay.
//!
//! Copies the bytes of a remote video URL into S3 without buffering the
//! whole payload: the HTTP response body is forwarded chunk-wise to the
//! storage client's multipart upload.

use std::time::Duration;

use futures::StreamExt;
use tracing::info;

use reel_storage::{video_content_type, StorageClient, StorageError};

use crate::error::{PipelineError, PipelineResult};

/// Relays a remote video URL into object storage.
#[derive(Debug, Clone)]
pub struct VideoRelay {
    http: reqwest::Client,
}

impl VideoRelay {
    /// Create a relay with the given transfer timeout. The timeout covers
    /// the whole transfer, not just connection setup.
    pub fn new(timeout: Duration) -> PipelineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Stream the URL's bytes into `s3://{bucket}/{key}`.
    ///
    /// A non-success status or an interrupted transfer is a download
    /// failure; a failed S3 write is a storage failure. No retry either way.
    pub async fn relay(
        &self,
        url: &str,
        storage: &StorageClient,
        bucket: &str,
        key: &str,
    ) -> PipelineResult<()> {
        info!("Downloading {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::download(format!(
                "GET {} returned status {}",
                url, status
            )));
        }

        let stream = response.bytes_stream().boxed();

        match storage
            .upload_stream(bucket, key, video_content_type(key), stream)
            .await
        {
            Ok(()) => {
                info!("Uploaded video to s3://{}/{}", bucket, key);
                Ok(())
            }
            // The source stream broke mid-transfer: a download failure, not
            // a storage one.
            Err(StorageError::SourceStream(msg)) => Err(PipelineError::download(msg)),
            Err(e) => Err(PipelineError::StorageWrite(e)),
        }
    }
}
