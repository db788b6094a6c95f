//! Speech synthesis through an external TTS command.

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{SpeechError, SpeechResult};
use crate::fallback::render_tone;

/// Configuration for speech synthesis.
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// External TTS program; `None` goes straight to the tone fallback
    pub program: Option<String>,
    /// Voice identifier passed to the program
    pub voice: String,
    /// Output sample rate
    pub sample_rate: u32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            program: None,
            voice: "af_heart".to_string(),
            sample_rate: 24_000,
        }
    }
}

impl TtsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            program: std::env::var("STORYCAST_TTS_PROGRAM").ok(),
            voice: std::env::var("STORYCAST_TTS_VOICE")
                .unwrap_or_else(|_| "af_heart".to_string()),
            sample_rate: std::env::var("STORYCAST_TTS_SAMPLE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24_000),
        }
    }
}

/// Segment-level speech synthesizer.
///
/// Tries the configured external TTS program first; any failure (missing
/// binary, nonzero exit, no output file) degrades to the deterministic
/// tone placeholder so the audio stage never blocks on synthesis.
pub struct Synthesizer {
    config: TtsConfig,
}

impl Synthesizer {
    /// Create a new synthesizer.
    pub fn new(config: TtsConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(TtsConfig::from_env())
    }

    /// The configured output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Synthesize one text segment into a WAV file at `dest`.
    pub async fn synthesize(&self, text: &str, dest: &Path) -> SpeechResult<()> {
        if let Some(program) = self.config.program.clone() {
            match self.run_external(&program, text, dest).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("TTS synthesis failed, using tone fallback: {}", e);
                }
            }
        }

        render_tone(text, dest, self.config.sample_rate)
    }

    async fn run_external(&self, program: &str, text: &str, dest: &Path) -> SpeechResult<()> {
        which::which(program)
            .map_err(|_| SpeechError::synthesis_failed(format!("{} not found in PATH", program)))?;

        debug!("Synthesizing {} chars with {}", text.chars().count(), program);

        let mut child = Command::new(program)
            .arg("--voice")
            .arg(&self.config.voice)
            .arg("--output")
            .arg(dest)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SpeechError::synthesis_failed("stdin not captured"))?;
        stdin.write_all(text.as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(SpeechError::synthesis_failed(format!(
                "{} exited with {:?}: {}",
                program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if !dest.exists() {
            return Err(SpeechError::synthesis_failed(format!(
                "{} produced no output file",
                program
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TtsConfig::default();
        assert!(config.program.is_none());
        assert_eq!(config.voice, "af_heart");
        assert_eq!(config.sample_rate, 24_000);
    }

    #[tokio::test]
    async fn test_synthesize_without_program_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("seg.wav");

        let synth = Synthesizer::new(TtsConfig::default());
        synth.synthesize("fallback please", &dest).await.unwrap();

        assert!(dest.exists());
        let reader = hound::WavReader::open(&dest).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
    }

    #[tokio::test]
    async fn test_synthesize_with_missing_program_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("seg.wav");

        let synth = Synthesizer::new(TtsConfig {
            program: Some("definitely-not-a-real-tts-binary".to_string()),
            ..TtsConfig::default()
        });
        synth.synthesize("degrade please", &dest).await.unwrap();

        assert!(dest.exists());
    }
}
