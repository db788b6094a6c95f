//! Content generation: one narration block per subject line.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use storycast_llm::{ChatClient, ScriptWriter};
use storycast_models::content::TITLE_MARKER;

use crate::error::{PipelineError, PipelineResult};
use crate::workdir::WorkDirs;

/// Read subject lines, skipping blanks.
pub async fn read_subjects(subjects_file: &Path) -> PipelineResult<Vec<String>> {
    if !subjects_file.exists() {
        return Err(PipelineError::missing_input(subjects_file));
    }

    let text = fs::read_to_string(subjects_file).await?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// A subject line may carry a `published title | working title` form; the
/// part before the separator is what the content file gets labeled with.
fn published_title(subject: &str) -> &str {
    match subject.split_once(" | ") {
        Some((published, _)) => published,
        None => subject,
    }
}

/// Generate narration for every subject and write `content.txt`.
///
/// Blocks are flushed per subject so a failed later subject keeps the
/// earlier ones on disk.
pub async fn run_content_generation(
    dirs: &WorkDirs,
    subjects_file: &Path,
    client: &ChatClient,
) -> PipelineResult<usize> {
    let subjects = read_subjects(subjects_file).await?;
    if subjects.is_empty() {
        return Err(PipelineError::stage_failed(
            "content",
            "subjects file is empty",
        ));
    }

    info!("Found {} subjects to process", subjects.len());

    let writer = ScriptWriter::new(client);
    let mut output = fs::File::create(dirs.content_file()).await?;

    for subject in &subjects {
        info!("Processing subject: {}", subject);
        let narration = writer.generate_narration(subject).await?;

        let block = format!(
            "{} {}\n{}\n\n",
            TITLE_MARKER,
            published_title(subject),
            narration.trim()
        );
        output.write_all(block.as_bytes()).await?;
        output.flush().await?;
    }

    info!("Content written to {}", dirs.content_file().display());
    Ok(subjects.len())
}
