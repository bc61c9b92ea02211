//! MediaConvert job submission client.
//!
//! This crate provides:
//! - One-time discovery of the account's region-specific endpoint
//! - Fire-and-forget job submission with two fixed MP4 renditions

pub mod client;
pub mod error;

pub use client::{TranscodeClient, TranscodeConfig};
pub use error::{TranscodeError, TranscodeResult};
