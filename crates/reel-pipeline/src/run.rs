//! Run orchestration.
//!
//! One run is strictly linear: fetch highlights, persist the raw JSON, scan
//! for candidate URLs, pick one at random, relay it into storage, submit a
//! transcode job, and write the day's log entry. Any error after
//! configuration is caught here, logged, and recorded in the log object;
//! nothing is retried and nothing is rolled back.

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::Value;
use tracing::{error, info};

use reel_models::{scan_candidate_urls, video_filename, RunOutcome, RunPaths};

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// Source of highlight metadata.
#[async_trait]
pub trait HighlightSource: Send + Sync {
    async fn fetch(&self, league: &str, date: &str) -> PipelineResult<Value>;
}

/// Object storage as the orchestrator sees it.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put_json(&self, bucket: &str, key: &str, doc: &Value) -> PipelineResult<()>;
    async fn put_text(&self, bucket: &str, key: &str, text: &str) -> PipelineResult<()>;
    async fn relay_video(&self, source_url: &str, bucket: &str, key: &str) -> PipelineResult<()>;
}

/// Transcode job submission.
#[async_trait]
pub trait TranscodeSubmitter: Send + Sync {
    async fn submit(&self, input_s3_url: &str, output_s3_prefix: &str) -> PipelineResult<String>;
}

/// Sequences one pipeline run across the external collaborators.
pub struct Runner<H, S, T> {
    config: PipelineConfig,
    source: H,
    store: S,
    transcoder: T,
}

impl<H, S, T> Runner<H, S, T>
where
    H: HighlightSource,
    S: MediaStore,
    T: TranscodeSubmitter,
{
    pub fn new(config: PipelineConfig, source: H, store: S, transcoder: T) -> Self {
        Self {
            config,
            source,
            store,
            transcoder,
        }
    }

    /// Execute one run and write its log entry.
    ///
    /// The run date is the UTC date at the moment this is called; all
    /// storage keys derive from it. The randomness source is a parameter so
    /// callers (and tests) control selection. Never returns an error: every
    /// failure is absorbed into the returned outcome after being logged.
    pub async fn run_once<R: Rng + ?Sized>(&self, rng: &mut R) -> RunOutcome {
        let started = Utc::now();
        let date = started.format("%Y-%m-%d").to_string();
        let paths = RunPaths::new(&self.config.league, &date);

        let outcome = match self.execute(&paths, rng).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Pipeline run failed: {}", e);
                RunOutcome::Failure {
                    message: e.to_string(),
                }
            }
        };

        // The log write is best-effort: a failure here must not mask the
        // run's outcome.
        let line = outcome.log_line(Utc::now());
        if let Err(e) = self
            .store
            .put_text(&self.config.logs_bucket, &paths.log_key(), &line)
            .await
        {
            error!(
                "Failed to write run log to s3://{}/{}: {}",
                self.config.logs_bucket,
                paths.log_key(),
                e
            );
        }

        outcome
    }

    async fn execute<R: Rng + ?Sized>(
        &self,
        paths: &RunPaths,
        rng: &mut R,
    ) -> PipelineResult<RunOutcome> {
        let highlights = self.source.fetch(paths.league(), paths.date()).await?;

        let metadata_key = paths.metadata_key();
        self.store
            .put_json(&self.config.metadata_bucket, &metadata_key, &highlights)
            .await?;
        info!(
            "Saved highlights to s3://{}/{}",
            self.config.metadata_bucket, metadata_key
        );

        let candidates = scan_candidate_urls(&highlights);
        let chosen = match candidates.choose(rng) {
            Some(url) => url,
            None => {
                error!("No video URLs found in highlight document");
                return Ok(RunOutcome::NoCandidates);
            }
        };
        info!(
            "Selected {} from {} candidate video URLs",
            chosen,
            candidates.len()
        );

        let incoming_key = paths.incoming_key(&video_filename(chosen));
        self.store
            .relay_video(chosen, &self.config.videos_bucket, &incoming_key)
            .await?;

        let input_url = format!("s3://{}/{}", self.config.videos_bucket, incoming_key);
        let output_prefix = format!(
            "s3://{}/{}",
            self.config.videos_bucket,
            paths.processed_prefix()
        );
        let job_id = self.transcoder.submit(&input_url, &output_prefix).await?;

        Ok(RunOutcome::Success { input_url, job_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            league: "nba".to_string(),
            metadata_bucket: "meta-bucket".to_string(),
            videos_bucket: "video-bucket".to_string(),
            logs_bucket: "log-bucket".to_string(),
            download_timeout: Duration::from_secs(5),
            exit_on_failure: false,
        }
    }

    fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    struct StubSource {
        doc: Value,
    }

    #[async_trait]
    impl HighlightSource for StubSource {
        async fn fetch(&self, _league: &str, _date: &str) -> PipelineResult<Value> {
            Ok(self.doc.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl HighlightSource for FailingSource {
        async fn fetch(&self, _league: &str, _date: &str) -> PipelineResult<Value> {
            Err(PipelineError::Fetch(
                reel_highlights::HighlightError::Status(503),
            ))
        }
    }

    #[derive(Default)]
    struct StoreState {
        json_writes: Mutex<Vec<(String, String, Value)>>,
        text_writes: Mutex<Vec<(String, String, String)>>,
        relayed: Mutex<Vec<(String, String, String)>>,
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        state: Arc<StoreState>,
        fail_relay: bool,
    }

    #[async_trait]
    impl MediaStore for RecordingStore {
        async fn put_json(&self, bucket: &str, key: &str, doc: &Value) -> PipelineResult<()> {
            self.state.json_writes.lock().unwrap().push((
                bucket.to_string(),
                key.to_string(),
                doc.clone(),
            ));
            Ok(())
        }

        async fn put_text(&self, bucket: &str, key: &str, text: &str) -> PipelineResult<()> {
            self.state.text_writes.lock().unwrap().push((
                bucket.to_string(),
                key.to_string(),
                text.to_string(),
            ));
            Ok(())
        }

        async fn relay_video(
            &self,
            source_url: &str,
            bucket: &str,
            key: &str,
        ) -> PipelineResult<()> {
            if self.fail_relay {
                return Err(PipelineError::download("connection reset"));
            }
            self.state.relayed.lock().unwrap().push((
                source_url.to_string(),
                bucket.to_string(),
                key.to_string(),
            ));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct StubTranscoder {
        fail: bool,
        submissions: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl TranscodeSubmitter for StubTranscoder {
        async fn submit(
            &self,
            input_s3_url: &str,
            output_s3_prefix: &str,
        ) -> PipelineResult<String> {
            if self.fail {
                return Err(PipelineError::Submit(
                    reel_transcode::TranscodeError::submit_failed("role not authorized"),
                ));
            }
            self.submissions
                .lock()
                .unwrap()
                .push((input_s3_url.to_string(), output_s3_prefix.to_string()));
            Ok("job-123".to_string())
        }
    }

    #[tokio::test]
    async fn test_happy_path_writes_all_artifacts() {
        let doc = json!({
            "games": [{"clip": "https://cdn.example.com/a/b/clip123.mp4?sig=xyz"}]
        });
        let store = RecordingStore::default();
        let state = store.state.clone();
        let transcoder = StubTranscoder::default();
        let submissions = transcoder.submissions.clone();

        let runner = Runner::new(test_config(), StubSource { doc: doc.clone() }, store, transcoder);
        let outcome = runner.run_once(&mut StdRng::seed_from_u64(1)).await;

        let date = today();

        assert_eq!(
            outcome,
            RunOutcome::Success {
                input_url: format!("s3://video-bucket/incoming/nba/{}/clip123.mp4", date),
                job_id: "job-123".to_string(),
            }
        );

        // Raw highlight JSON persisted unmodified
        let json_writes = state.json_writes.lock().unwrap();
        assert_eq!(json_writes.len(), 1);
        assert_eq!(json_writes[0].0, "meta-bucket");
        assert_eq!(
            json_writes[0].1,
            format!("highlights/nba/{}/highlights.json", date)
        );
        assert_eq!(json_writes[0].2, doc);

        // Video relayed under the derived key
        let relayed = state.relayed.lock().unwrap();
        assert_eq!(relayed.len(), 1);
        assert_eq!(
            relayed[0],
            (
                "https://cdn.example.com/a/b/clip123.mp4?sig=xyz".to_string(),
                "video-bucket".to_string(),
                format!("incoming/nba/{}/clip123.mp4", date),
            )
        );

        // Exactly one job, against the uploaded object and output prefix
        let submissions = submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(
            submissions[0],
            (
                format!("s3://video-bucket/incoming/nba/{}/clip123.mp4", date),
                format!("s3://video-bucket/processed/nba/{}/", date),
            )
        );

        // Log entry carries the job id
        let text_writes = state.text_writes.lock().unwrap();
        assert_eq!(text_writes.len(), 1);
        assert_eq!(text_writes[0].0, "log-bucket");
        assert_eq!(text_writes[0].1, format!("logs/{}/pipeline.log", date));
        assert!(text_writes[0].2.contains("job-123"));
        assert!(text_writes[0].2.contains("Success"));
    }

    #[tokio::test]
    async fn test_no_candidates_skips_relay_and_submit() {
        let doc = json!({"games": [{"page": "http://x.com/page.html"}], "count": 0});
        let store = RecordingStore::default();
        let state = store.state.clone();
        let transcoder = StubTranscoder::default();
        let submissions = transcoder.submissions.clone();

        let runner = Runner::new(test_config(), StubSource { doc }, store, transcoder);
        let outcome = runner.run_once(&mut StdRng::seed_from_u64(1)).await;

        assert_eq!(outcome, RunOutcome::NoCandidates);
        assert!(state.relayed.lock().unwrap().is_empty());
        assert!(submissions.lock().unwrap().is_empty());

        let text_writes = state.text_writes.lock().unwrap();
        assert_eq!(text_writes.len(), 1);
        assert!(text_writes[0].2.contains("No video URLs found"));
    }

    #[tokio::test]
    async fn test_submit_failure_leaves_uploaded_video_in_place() {
        let doc = json!({"clip": "http://cdn.example.com/clip.mp4"});
        let store = RecordingStore::default();
        let state = store.state.clone();
        let transcoder = StubTranscoder {
            fail: true,
            ..Default::default()
        };

        let runner = Runner::new(test_config(), StubSource { doc }, store, transcoder);
        let outcome = runner.run_once(&mut StdRng::seed_from_u64(1)).await;

        assert!(outcome.is_failure());

        // No rollback: the relayed video stays in storage
        assert_eq!(state.relayed.lock().unwrap().len(), 1);

        // The day's log records the error and no job id
        let text_writes = state.text_writes.lock().unwrap();
        assert_eq!(text_writes.len(), 1);
        assert!(text_writes[0].2.starts_with("ERROR: "));
        assert!(text_writes[0].2.contains("role not authorized"));
        assert!(!text_writes[0].2.contains("job-123"));
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_error_log_only() {
        let store = RecordingStore::default();
        let state = store.state.clone();

        let runner = Runner::new(
            test_config(),
            FailingSource,
            store,
            StubTranscoder::default(),
        );
        let outcome = runner.run_once(&mut StdRng::seed_from_u64(1)).await;

        assert!(outcome.is_failure());
        assert!(state.json_writes.lock().unwrap().is_empty());
        assert!(state.relayed.lock().unwrap().is_empty());

        let text_writes = state.text_writes.lock().unwrap();
        assert_eq!(text_writes.len(), 1);
        assert!(text_writes[0].2.starts_with("ERROR: "));
    }

    #[tokio::test]
    async fn test_seeded_rng_pins_selection() {
        let doc = json!([
            "http://cdn.example.com/one.mp4",
            "http://cdn.example.com/two.mp4",
            "http://cdn.example.com/three.mp4"
        ]);

        let mut picks = Vec::new();
        for _ in 0..2 {
            let store = RecordingStore::default();
            let state = store.state.clone();
            let runner = Runner::new(
                test_config(),
                StubSource { doc: doc.clone() },
                store,
                StubTranscoder::default(),
            );
            runner.run_once(&mut StdRng::seed_from_u64(42)).await;
            picks.push(state.relayed.lock().unwrap()[0].0.clone());
        }

        assert_eq!(picks[0], picks[1]);
    }
}
