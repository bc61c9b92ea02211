//! Production adapters binding the orchestrator seams to the service
//! clients.

use async_trait::async_trait;
use serde_json::Value;

use reel_highlights::HighlightClient;
use reel_storage::StorageClient;
use reel_transcode::TranscodeClient;

use crate::error::PipelineResult;
use crate::relay::VideoRelay;
use crate::run::{HighlightSource, MediaStore, TranscodeSubmitter};

#[async_trait]
impl HighlightSource for HighlightClient {
    async fn fetch(&self, league: &str, date: &str) -> PipelineResult<Value> {
        Ok(HighlightClient::fetch(self, league, date).await?)
    }
}

/// S3-backed media store: plain object writes plus the streaming relay.
pub struct S3MediaStore {
    storage: StorageClient,
    relay: VideoRelay,
}

impl S3MediaStore {
    pub fn new(storage: StorageClient, relay: VideoRelay) -> Self {
        Self { storage, relay }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put_json(&self, bucket: &str, key: &str, doc: &Value) -> PipelineResult<()> {
        Ok(self.storage.put_json(bucket, key, doc).await?)
    }

    async fn put_text(&self, bucket: &str, key: &str, text: &str) -> PipelineResult<()> {
        Ok(self.storage.put_text(bucket, key, text).await?)
    }

    async fn relay_video(&self, source_url: &str, bucket: &str, key: &str) -> PipelineResult<()> {
        self.relay.relay(source_url, &self.storage, bucket, key).await
    }
}

#[async_trait]
impl TranscodeSubmitter for TranscodeClient {
    async fn submit(&self, input_s3_url: &str, output_s3_prefix: &str) -> PipelineResult<String> {
        Ok(self.submit_job(input_s3_url, output_s3_prefix).await?)
    }
}
