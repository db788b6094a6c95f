//! Image stage: one illustration per script line.

use tokio::fs;
use tracing::{info, warn};

use storycast_images::{generate_placeholder, ImageSearchClient};
use storycast_llm::{extract_keyword, ChatClient};
use storycast_models::encoding::{TARGET_HEIGHT, TARGET_WIDTH};

use crate::error::{PipelineError, PipelineResult};
use crate::workdir::{reset_dir, WorkDirs};

/// Lines used when no audio exists to pace the image count.
const FALLBACK_LINE_COUNT: usize = 5;

/// Filler line when the script is shorter than the audio count.
const CONTINUATION_LINE: &str = "Content continued...";

/// Derive a keyword and fetch one illustration per script line.
///
/// The number of images tracks the audio stage's output so pairing stays
/// 1:1. Download failures degrade to generated placeholders. Returns the
/// number of images produced; zero is a stage error.
pub async fn run_image_stage(
    dirs: &WorkDirs,
    chat: &ChatClient,
    images: &ImageSearchClient,
) -> PipelineResult<usize> {
    let script_path = dirs.current_script();
    if !script_path.exists() {
        return Err(PipelineError::missing_input(script_path));
    }

    reset_dir(&dirs.images_dir()).await?;

    let text = fs::read_to_string(&script_path).await?;
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    let chunks = chunk_lines_by_audio_count(lines, count_audio_files(dirs).await);
    info!("Generating {} keywords and images", chunks.len());

    let mut keywords = Vec::new();
    let mut produced = 0usize;

    for (idx, chunk) in chunks.iter().enumerate() {
        let keyword = extract_keyword(chat, chunk).await;
        info!("Keyword for chunk {}: {}", idx + 1, keyword);

        let image_path = dirs.images_dir().join(format!("output_{}.jpg", idx));

        let fetched = match images.fetch_illustration(&keyword, &image_path).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Download failed for '{}', using placeholder: {}", keyword, e);
                generate_placeholder(&image_path, idx, TARGET_WIDTH, TARGET_HEIGHT).is_ok()
            }
        };

        if fetched {
            produced += 1;
        }
        keywords.push(keyword);
    }

    fs::write(dirs.keywords_file(), keywords.join("\n")).await?;

    if produced == 0 {
        return Err(PipelineError::NoArtifacts { stage: "image" });
    }

    info!("Produced {}/{} images", produced, chunks.len());
    Ok(produced)
}

async fn count_audio_files(dirs: &WorkDirs) -> usize {
    let mut count = 0usize;
    if let Ok(mut entries) = fs::read_dir(dirs.audio_dir()).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_wav = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("wav"))
                .unwrap_or(false);
            if is_wav {
                count += 1;
            }
        }
    }
    count
}

/// Pick one text chunk per audio file (1 line = 1 audio = 1 image).
///
/// With no audio present the first few lines stand in; a script shorter
/// than the audio count is padded with a continuation line.
fn chunk_lines_by_audio_count(lines: Vec<String>, audio_count: usize) -> Vec<String> {
    if audio_count == 0 {
        return lines.into_iter().take(FALLBACK_LINE_COUNT).collect();
    }

    let mut chunks: Vec<String> = lines.into_iter().take(audio_count).collect();
    while chunks.len() < audio_count {
        chunks.push(CONTINUATION_LINE.to_string());
    }
    chunks
}
