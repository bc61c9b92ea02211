//! Run outcome record.
//!
//! Each pipeline run ends in exactly one of three outcomes, rendered to a
//! single line in the day's log object.

use chrono::{DateTime, Utc};

/// The terminal state of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The highlight document contained no candidate video URLs. Not an
    /// error: the run ends cleanly after logging.
    NoCandidates,
    /// A video was relayed and a transcode job submitted.
    Success {
        /// S3 URL of the uploaded source video.
        input_url: String,
        /// Job id assigned by the transcode service.
        job_id: String,
    },
    /// The run aborted partway through.
    Failure { message: String },
}

impl RunOutcome {
    /// Render the outcome as the day's log entry.
    pub fn log_line(&self, at: DateTime<Utc>) -> String {
        match self {
            RunOutcome::NoCandidates => "No video URLs found in response\n".to_string(),
            RunOutcome::Success { input_url, job_id } => format!(
                "{} - Success. Input: {}. Job: {}\n",
                at.to_rfc3339(),
                input_url,
                job_id
            ),
            RunOutcome::Failure { message } => format!("ERROR: {}\n", message),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failure { .. })
    }
}
