//! Per-run storage key derivation.
//!
//! Every object the pipeline writes is keyed by `(league, date)`, computed
//! once when the run starts. Same-day reruns derive the same keys and
//! overwrite (last-writer-wins).

/// Storage key layout for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    league: String,
    date: String,
}

impl RunPaths {
    /// Create the key layout for a run of `league` on `date` (`YYYY-MM-DD`).
    pub fn new(league: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            league: league.into(),
            date: date.into(),
        }
    }

    pub fn league(&self) -> &str {
        &self.league
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Key for the raw highlight JSON as returned by the provider.
    pub fn metadata_key(&self) -> String {
        format!("highlights/{}/{}/highlights.json", self.league, self.date)
    }

    /// Key for the downloaded source video.
    pub fn incoming_key(&self, filename: &str) -> String {
        format!("incoming/{}/{}/{}", self.league, self.date, filename)
    }

    /// Prefix under which the transcode service writes its renditions.
    pub fn processed_prefix(&self) -> String {
        format!("processed/{}/{}/", self.league, self.date)
    }

    /// Key for the day's run log.
    pub fn log_key(&self) -> String {
        format!("logs/{}/pipeline.log", self.date)
    }
}

/// Derive the destination filename from a chosen video URL: the last path
/// segment with any query string or fragment stripped.
pub fn video_filename(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_paths_layout() {
        let paths = RunPaths::new("nba", "2025-03-14");

        assert_eq!(
            paths.metadata_key(),
            "highlights/nba/2025-03-14/highlights.json"
        );
        assert_eq!(
            paths.incoming_key("clip123.mp4"),
            "incoming/nba/2025-03-14/clip123.mp4"
        );
        assert_eq!(paths.processed_prefix(), "processed/nba/2025-03-14/");
        assert_eq!(paths.log_key(), "logs/2025-03-14/pipeline.log");
    }

    #[test]
    fn test_video_filename_strips_query() {
        assert_eq!(
            video_filename("https://cdn.example.com/a/b/clip123.mp4?sig=xyz"),
            "clip123.mp4"
        );
    }

    #[test]
    fn test_video_filename_plain() {
        assert_eq!(video_filename("http://x.com/clip.mp4"), "clip.mp4");
        assert_eq!(video_filename("http://x.com/a/b/c/d.mov"), "d.mov");
    }

    #[test]
    fn test_video_filename_fragment_and_edge_cases() {
        assert_eq!(video_filename("http://x.com/clip.mp4#t=30"), "clip.mp4");
        // No path separators: the whole remainder is the filename
        assert_eq!(video_filename("clip.mp4"), "clip.mp4");
    }
}
