//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Required input not found: {0}")]
    MissingInput(PathBuf),

    #[error("Stage '{stage}' produced no artifacts")]
    NoArtifacts { stage: &'static str },

    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: &'static str, message: String },

    #[error("Final video artifact not found after combine stage")]
    MissingArtifact,

    #[error("LLM error: {0}")]
    Llm(#[from] storycast_llm::LlmError),

    #[error("Media error: {0}")]
    Media(#[from] storycast_media::MediaError),

    #[error("Speech error: {0}")]
    Speech(#[from] storycast_speech::SpeechError),

    #[error("Image error: {0}")]
    Images(#[from] storycast_images::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput(path.into())
    }

    pub fn stage_failed(stage: &'static str, message: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            message: message.into(),
        }
    }
}
