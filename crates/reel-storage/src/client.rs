//! S3 client implementation.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};

/// Multipart part size. Parts are flushed once the buffer reaches this size,
/// bounding memory use regardless of payload size. S3 requires every part
/// except the last to be at least 5 MiB.
const PART_SIZE: usize = 8 * 1024 * 1024;

const DEFAULT_REGION: &str = "ap-south-1";

/// Configuration for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// AWS region
    pub region: String,
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
        }
    }
}

/// S3 storage client. Credentials come from the default AWS chain.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: Client,
}

impl StorageClient {
    /// Create a new client from configuration.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> Self {
        Self::new(S3Config::from_env()).await
    }

    /// Upload bytes to S3.
    pub async fn put_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!("Uploading {} bytes to s3://{}/{}", data.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(())
    }

    /// Upload a text object.
    pub async fn put_text(&self, bucket: &str, key: &str, text: &str) -> StorageResult<()> {
        self.put_bytes(bucket, key, text.as_bytes().to_vec(), "text/plain")
            .await
    }

    /// Upload a JSON document.
    pub async fn put_json(&self, bucket: &str, key: &str, doc: &Value) -> StorageResult<()> {
        let body = serde_json::to_vec(doc)?;
        self.put_bytes(bucket, key, body, "application/json").await
    }

    /// Upload an object from an async byte-chunk stream.
    ///
    /// Chunks accumulate into fixed-size parts uploaded via S3 multipart, so
    /// the full payload is never held in memory. A payload that fits in a
    /// single part is written with a plain `PutObject` instead. On error the
    /// multipart upload is aborted best-effort so no orphaned parts accrue
    /// storage.
    pub async fn upload_stream<S, E>(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        mut stream: S,
    ) -> StorageResult<()>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + Unpin,
        E: std::fmt::Display,
    {
        // Buffer until we know whether the payload exceeds a single part.
        let mut buf: Vec<u8> = Vec::with_capacity(PART_SIZE);
        let mut ended = false;

        while buf.len() < PART_SIZE {
            match stream.next().await {
                Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(StorageError::SourceStream(e.to_string())),
                None => {
                    ended = true;
                    break;
                }
            }
        }

        if ended {
            let total = buf.len() as u64;
            self.put_bytes(bucket, key, buf, content_type).await?;
            log_uploaded(bucket, key, total);
            return Ok(());
        }

        let mut upload = MultipartUpload::begin(&self.client, bucket, key, content_type).await?;

        let total = match stream_parts(&mut upload, buf, &mut stream).await {
            Ok(total) => total,
            Err(e) => {
                upload.abort().await;
                return Err(e);
            }
        };

        if let Err(e) = upload.complete().await {
            upload.abort().await;
            return Err(e);
        }

        log_uploaded(bucket, key, total);
        Ok(())
    }
}

fn log_uploaded(bucket: &str, key: &str, total: u64) {
    info!(
        "Uploaded s3://{}/{} ({:.1} MB)",
        bucket,
        key,
        total as f64 / (1024.0 * 1024.0)
    );
}

/// Drain the stream into fixed-size parts, starting from an already-buffered
/// first part. Returns the total byte count.
async fn stream_parts<S, E>(
    upload: &mut MultipartUpload<'_>,
    mut buf: Vec<u8>,
    stream: &mut S,
) -> StorageResult<u64>
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin,
    E: std::fmt::Display,
{
    let mut total = buf.len() as u64;

    loop {
        if buf.len() >= PART_SIZE {
            let part = std::mem::replace(&mut buf, Vec::with_capacity(PART_SIZE));
            upload.write_part(part).await?;
        }

        match stream.next().await {
            Some(Ok(chunk)) => {
                total += chunk.len() as u64;
                buf.extend_from_slice(&chunk);
            }
            Some(Err(e)) => return Err(StorageError::SourceStream(e.to_string())),
            None => break,
        }
    }

    // Final part may be under the part-size minimum
    if !buf.is_empty() {
        upload.write_part(buf).await?;
    }

    Ok(total)
}

/// In-flight multipart upload state.
struct MultipartUpload<'a> {
    client: &'a Client,
    bucket: &'a str,
    key: &'a str,
    upload_id: String,
    parts: Vec<CompletedPart>,
    next_part_number: i32,
}

impl<'a> MultipartUpload<'a> {
    async fn begin(
        client: &'a Client,
        bucket: &'a str,
        key: &'a str,
        content_type: &str,
    ) -> StorageResult<MultipartUpload<'a>> {
        let created = client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| {
                StorageError::upload_failed("no upload id in CreateMultipartUpload response")
            })?
            .to_string();

        debug!(
            "Started multipart upload {} for s3://{}/{}",
            upload_id, bucket, key
        );

        Ok(Self {
            client,
            bucket,
            key,
            upload_id,
            parts: Vec::new(),
            next_part_number: 1,
        })
    }

    async fn write_part(&mut self, data: Vec<u8>) -> StorageResult<()> {
        let part_number = self.next_part_number;

        let uploaded = self
            .client
            .upload_part()
            .bucket(self.bucket)
            .key(self.key)
            .upload_id(&self.upload_id)
            .part_number(part_number)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.parts.push(
            CompletedPart::builder()
                .set_e_tag(uploaded.e_tag().map(str::to_string))
                .part_number(part_number)
                .build(),
        );
        self.next_part_number += 1;

        Ok(())
    }

    async fn complete(&mut self) -> StorageResult<()> {
        let parts = std::mem::take(&mut self.parts);

        self.client
            .complete_multipart_upload()
            .bucket(self.bucket)
            .key(self.key)
            .upload_id(&self.upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(())
    }

    async fn abort(&self) {
        if let Err(e) = self
            .client
            .abort_multipart_upload()
            .bucket(self.bucket)
            .key(self.key)
            .upload_id(&self.upload_id)
            .send()
            .await
        {
            warn!(
                "Failed to abort multipart upload {} for s3://{}/{}: {}",
                self.upload_id, self.bucket, self.key, e
            );
        }
    }
}

/// Content type for a video object key.
pub fn video_content_type(key: &str) -> &'static str {
    let key = key.to_ascii_lowercase();
    if key.ends_with(".mp4") {
        "video/mp4"
    } else if key.ends_with(".mov") {
        "video/quicktime"
    } else if key.ends_with(".m3u8") {
        "application/vnd.apple.mpegurl"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_content_type() {
        assert_eq!(video_content_type("incoming/nba/x/clip.mp4"), "video/mp4");
        assert_eq!(video_content_type("clip.MOV"), "video/quicktime");
        assert_eq!(
            video_content_type("stream.m3u8"),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(video_content_type("clip123"), "application/octet-stream");
    }
}
