//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// File with one video subject per line
    pub subjects_file: PathBuf,
    /// Scratch directory for intermediate files
    pub work_dir: PathBuf,
    /// Directory for final videos and exported run artifacts
    pub output_dir: PathBuf,
    /// Wall-clock timeout per pipeline stage
    pub stage_timeout: Duration,
    /// Extra attempts allowed per task, timeouts only
    pub max_retries: u32,
    /// Per-segment character ceiling for speech synthesis
    pub segment_max_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            subjects_file: PathBuf::from("subjects.txt"),
            work_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
            stage_timeout: Duration::from_secs(1800),
            max_retries: 2,
            segment_max_chars: 400,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            subjects_file: std::env::var("STORYCAST_SUBJECTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.subjects_file),
            work_dir: std::env::var("STORYCAST_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("STORYCAST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            stage_timeout: Duration::from_secs(
                std::env::var("STORYCAST_STAGE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1800),
            ),
            max_retries: std::env::var("STORYCAST_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            segment_max_chars: std::env::var("STORYCAST_SEGMENT_MAX_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.segment_max_chars),
        }
    }
}
