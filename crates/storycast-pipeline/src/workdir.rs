//! On-disk layout of the pipeline's work and output directories.
//!
//! Every stage hands files to the next through this layout, so the paths
//! live in one place instead of being scattered per stage.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::PipelineResult;

/// Resolved work/output directory layout.
#[derive(Debug, Clone)]
pub struct WorkDirs {
    work_dir: PathBuf,
    output_dir: PathBuf,
}

impl WorkDirs {
    pub fn new(work_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generated narration for all subjects.
    pub fn content_file(&self) -> PathBuf {
        self.work_dir.join("content.txt")
    }

    /// The plan manifest.
    pub fn plan_file(&self) -> PathBuf {
        self.work_dir.join("plan.txt")
    }

    /// Per-video script files.
    pub fn plan_dir(&self) -> PathBuf {
        self.work_dir.join("plan")
    }

    /// Shared current-script slot, overwritten per task.
    pub fn current_script(&self) -> PathBuf {
        self.work_dir.join("current_script.txt")
    }

    /// Per-line audio files for the current task.
    pub fn audio_dir(&self) -> PathBuf {
        self.work_dir.join("my_audio")
    }

    /// Per-segment scratch audio for the current line.
    pub fn segments_dir(&self) -> PathBuf {
        self.work_dir.join("audio_segments")
    }

    /// Per-line images for the current task.
    pub fn images_dir(&self) -> PathBuf {
        self.work_dir.join("my_images")
    }

    /// Keywords derived for the current task, one per line.
    pub fn keywords_file(&self) -> PathBuf {
        self.work_dir.join("keywords.txt")
    }

    /// Per-pair clips before concatenation.
    pub fn clips_dir(&self) -> PathBuf {
        self.work_dir.join("clips")
    }

    /// Fixed-name artifact expected after the combine stage.
    pub fn final_video(&self) -> PathBuf {
        self.work_dir.join("final_video.mp4")
    }

    /// Where finished videos land.
    pub fn result_dir(&self) -> PathBuf {
        self.output_dir.join("my_result")
    }

    /// Exported copy of the plan scripts for review.
    pub fn scripts_export_dir(&self) -> PathBuf {
        self.output_dir.join("scripts")
    }

    /// Progress store location.
    pub fn progress_file(&self) -> PathBuf {
        self.work_dir.join("progress.json")
    }

    /// Create the base directories.
    pub async fn ensure_base(&self) -> PipelineResult<()> {
        fs::create_dir_all(&self.work_dir).await?;
        fs::create_dir_all(&self.output_dir).await?;
        fs::create_dir_all(self.result_dir()).await?;
        Ok(())
    }
}

/// Remove and recreate a directory so a stage starts from a clean slate.
pub async fn reset_dir(dir: &Path) -> PipelineResult<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).await?;
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Recursively copy a directory tree, replacing the destination.
pub async fn copy_dir_replacing(src: &Path, dst: &Path) -> PipelineResult<()> {
    reset_dir(dst).await?;

    // recursion via an explicit stack; the trees here are shallow
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to).await?;
        let mut entries = fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                fs::copy(entry.path(), target).await?;
            }
        }
    }

    Ok(())
}
