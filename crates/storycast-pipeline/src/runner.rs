//! The real per-video task runner.
//!
//! Runs audio → images → video for one task, each stage bounded by the
//! configured wall-clock timeout, and moves the final artifact into the
//! result directory.

use std::future::Future;

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use storycast_images::ImageSearchClient;
use storycast_llm::ChatClient;
use storycast_media::move_file;
use storycast_models::{sanitize_title, EncodingConfig, Task};
use storycast_speech::Synthesizer;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::scheduler::{AttemptOutcome, TaskRunner};
use crate::stages::{run_audio_stage, run_image_stage, run_video_stage};
use crate::workdir::WorkDirs;

/// Production task runner wired to the external services.
pub struct VideoTaskRunner {
    dirs: WorkDirs,
    config: PipelineConfig,
    chat: ChatClient,
    images: ImageSearchClient,
    synth: Synthesizer,
    encoding: EncodingConfig,
}

impl VideoTaskRunner {
    pub fn new(
        dirs: WorkDirs,
        config: PipelineConfig,
        chat: ChatClient,
        images: ImageSearchClient,
        synth: Synthesizer,
    ) -> Self {
        Self {
            dirs,
            config,
            chat,
            images,
            synth,
            encoding: EncodingConfig::default(),
        }
    }

    /// Run one stage under the wall-clock budget, mapping the result into
    /// an attempt outcome. `Ok(None)` means the stage passed.
    async fn bounded<T, F>(&self, stage: F) -> Option<AttemptOutcome>
    where
        F: Future<Output = PipelineResult<T>>,
    {
        match tokio::time::timeout(self.config.stage_timeout, stage).await {
            Err(_) => Some(AttemptOutcome::TimedOut),
            Ok(Err(e)) => Some(AttemptOutcome::Errored(e.to_string())),
            Ok(Ok(_)) => None,
        }
    }

    async fn stage_script(&self, task: &Task) -> PipelineResult<()> {
        if !task.script_path.exists() {
            return Err(crate::error::PipelineError::missing_input(&task.script_path));
        }
        fs::copy(&task.script_path, self.dirs.current_script()).await?;
        Ok(())
    }

    async fn collect_artifact(&self, task: &Task) -> PipelineResult<()> {
        let final_video = self.dirs.final_video();
        if !final_video.exists() {
            return Err(crate::error::PipelineError::MissingArtifact);
        }

        let output = self
            .dirs
            .result_dir()
            .join(format!("{}.mp4", sanitize_title(&task.title)));
        move_file(&final_video, &output).await?;
        info!("Video saved: {}", output.display());
        Ok(())
    }
}

#[async_trait]
impl TaskRunner for VideoTaskRunner {
    async fn run_task(&self, task: &Task) -> AttemptOutcome {
        // Script staging is plain IO, not a bounded external stage
        if let Err(e) = self.stage_script(task).await {
            return AttemptOutcome::Errored(e.to_string());
        }

        info!("Step 1: generating audio");
        if let Some(outcome) = self
            .bounded(run_audio_stage(
                &self.dirs,
                &self.synth,
                self.config.segment_max_chars,
            ))
            .await
        {
            return outcome;
        }

        info!("Step 2: generating keywords and fetching images");
        if let Some(outcome) = self
            .bounded(run_image_stage(&self.dirs, &self.chat, &self.images))
            .await
        {
            return outcome;
        }

        info!("Step 3: combining audio and images");
        if let Some(outcome) = self
            .bounded(run_video_stage(&self.dirs, &self.encoding))
            .await
        {
            return outcome;
        }

        match self.collect_artifact(task).await {
            Ok(()) => AttemptOutcome::Completed,
            Err(e) => AttemptOutcome::Errored(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storycast_images::ImageSearchConfig;
    use storycast_llm::ChatClientConfig;
    use storycast_speech::TtsConfig;
    use std::time::Duration;

    fn test_runner(dirs: WorkDirs) -> VideoTaskRunner {
        let chat = ChatClient::new(ChatClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "test-key".to_string(),
            model: "test-model".to_string(),
            timeout: Duration::from_millis(200),
            max_retries: 0,
        })
        .unwrap();
        let images = ImageSearchClient::new(ImageSearchConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
            max_candidates: 1,
        })
        .unwrap();
        let synth = Synthesizer::new(TtsConfig::default());
        VideoTaskRunner::new(dirs, PipelineConfig::default(), chat, images, synth)
    }

    #[tokio::test]
    async fn test_missing_script_errors_without_retry_classification() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path().join("work"), tmp.path().join("out"));
        dirs.ensure_base().await.unwrap();

        let runner = test_runner(dirs);
        let task = Task::new("ghost", tmp.path().join("missing.txt"));

        let outcome = runner.run_task(&task).await;
        match outcome {
            AttemptOutcome::Errored(message) => {
                assert!(message.contains("not found"));
            }
            other => panic!("expected error outcome, got {:?}", other),
        }
    }
}
