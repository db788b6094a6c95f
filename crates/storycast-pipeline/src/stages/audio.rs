//! Audio stage: one narration WAV per script line.

use tokio::fs;
use tracing::{info, warn};

use storycast_speech::{concat_wavs, split_into_segments, Synthesizer};

use crate::error::{PipelineError, PipelineResult};
use crate::workdir::{reset_dir, WorkDirs};

/// Synthesize one audio file per nonempty script line.
///
/// Each line is segmented, synthesized segment by segment, and the
/// segments are concatenated into `my_audio/output_<line>.wav`. Returns
/// the number of lines that produced audio; zero is a stage error.
pub async fn run_audio_stage(
    dirs: &WorkDirs,
    synth: &Synthesizer,
    max_chars: usize,
) -> PipelineResult<usize> {
    let script_path = dirs.current_script();
    if !script_path.exists() {
        return Err(PipelineError::missing_input(script_path));
    }

    reset_dir(&dirs.audio_dir()).await?;
    reset_dir(&dirs.segments_dir()).await?;

    let text = fs::read_to_string(&script_path).await?;
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    if lines.is_empty() {
        return Err(PipelineError::stage_failed("audio", "script file is empty"));
    }

    info!("Found {} lines to synthesize", lines.len());

    let mut produced = 0usize;
    for (line_idx, line) in lines.iter().enumerate() {
        match render_line(dirs, synth, line, line_idx, max_chars).await {
            Ok(()) => produced += 1,
            Err(e) => warn!("No audio for line {}: {}", line_idx + 1, e),
        }
    }

    // per-segment scratch is not needed once lines are concatenated
    let _ = fs::remove_dir_all(dirs.segments_dir()).await;

    if produced == 0 {
        return Err(PipelineError::NoArtifacts { stage: "audio" });
    }

    info!("Synthesized {}/{} lines", produced, lines.len());
    Ok(produced)
}

async fn render_line(
    dirs: &WorkDirs,
    synth: &Synthesizer,
    line: &str,
    line_idx: usize,
    max_chars: usize,
) -> PipelineResult<()> {
    let segments = split_into_segments(line, max_chars);
    info!(
        "Line {}: {} chars in {} segments",
        line_idx + 1,
        line.chars().count(),
        segments.len()
    );

    let mut segment_files = Vec::new();
    for (seg_idx, segment) in segments.iter().enumerate() {
        let segment_file = dirs
            .segments_dir()
            .join(format!("line_{}_seg_{}.wav", line_idx, seg_idx));

        match synth.synthesize(segment, &segment_file).await {
            Ok(()) => segment_files.push(segment_file),
            Err(e) => warn!(
                "Segment {}/{} of line {} failed: {}",
                seg_idx + 1,
                segments.len(),
                line_idx + 1,
                e
            ),
        }
    }

    if segment_files.is_empty() {
        return Err(storycast_speech::SpeechError::NoAudio(line_idx).into());
    }

    let line_file = dirs.audio_dir().join(format!("output_{}.wav", line_idx));
    concat_wavs(&segment_files, &line_file)?;

    for file in segment_files {
        let _ = fs::remove_file(file).await;
    }

    Ok(())
}
