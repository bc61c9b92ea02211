//! Highlight pipeline binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_highlights::HighlightClient;
use reel_pipeline::{PipelineConfig, Runner, S3MediaStore, VideoRelay};
use reel_storage::StorageClient;
use reel_transcode::TranscodeClient;

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting reel-pipeline");

    // Configuration failures abort before any external call
    let config = match PipelineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let source = match HighlightClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create highlight client: {}", e);
            std::process::exit(1);
        }
    };

    let transcoder = match TranscodeClient::from_env().await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create transcode client: {}", e);
            std::process::exit(1);
        }
    };

    let relay = match VideoRelay::new(config.download_timeout) {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to create video relay: {}", e);
            std::process::exit(1);
        }
    };

    let storage = StorageClient::from_env().await;
    let store = S3MediaStore::new(storage, relay);

    let exit_on_failure = config.exit_on_failure;
    let runner = Runner::new(config, source, store, transcoder);

    let outcome = runner.run_once(&mut rand::rng()).await;

    if outcome.is_failure() && exit_on_failure {
        std::process::exit(1);
    }

    info!("Run complete");
}
