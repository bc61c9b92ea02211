//! S3 storage client for pipeline artifacts.
//!
//! This crate provides:
//! - Byte/text/JSON object writes
//! - Streaming multipart upload for video relay

pub mod client;
pub mod error;

pub use client::{video_content_type, S3Config, StorageClient};
pub use error::{StorageError, StorageResult};
