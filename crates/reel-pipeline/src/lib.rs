//! Highlight pipeline orchestration.
//!
//! This crate provides:
//! - Pipeline configuration from environment variables
//! - The streaming video relay (HTTP source to S3)
//! - The run orchestrator with its single failure boundary
//! - Production adapters binding the orchestrator to the service clients

pub mod adapters;
pub mod config;
pub mod error;
pub mod relay;
pub mod run;

pub use adapters::S3MediaStore;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use relay::VideoRelay;
pub use run::{HighlightSource, MediaStore, Runner, TranscodeSubmitter};
