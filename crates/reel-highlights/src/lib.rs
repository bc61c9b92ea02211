//! Client for the sports highlight provider API.
//!
//! This crate provides:
//! - Configuration from environment variables
//! - A single timed-out GET returning the provider's JSON unmodified

pub mod client;
pub mod error;

pub use client::{HighlightApiConfig, HighlightClient};
pub use error::{HighlightError, HighlightResult};
