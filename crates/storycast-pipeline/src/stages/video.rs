//! Video stage: pair images with audio and combine into the final MP4.

use tokio::fs;
use tracing::{info, warn};

use storycast_images::cover_resize;
use storycast_media::{build_clip, concat_clips, duration_or_default, list_media_files};
use storycast_models::encoding::{DEFAULT_CLIP_SECS, TARGET_HEIGHT, TARGET_WIDTH};
use storycast_models::EncodingConfig;

use crate::error::{PipelineError, PipelineResult};
use crate::workdir::{reset_dir, WorkDirs};

/// Pair images with audio by index and build the fixed-name final video.
pub async fn run_video_stage(dirs: &WorkDirs, encoding: &EncodingConfig) -> PipelineResult<()> {
    let images_dir = dirs.images_dir();
    let audio_dir = dirs.audio_dir();

    if !images_dir.exists() || !audio_dir.exists() {
        return Err(PipelineError::stage_failed(
            "video",
            "images or audio directory missing",
        ));
    }

    let images = list_media_files(&images_dir, &["png", "jpg", "jpeg"]).await?;
    let audios = list_media_files(&audio_dir, &["wav"]).await?;
    info!("Found {} images and {} audio files", images.len(), audios.len());

    if images.len() != audios.len() {
        warn!(
            "File count mismatch, pairing the first {}",
            images.len().min(audios.len())
        );
    }

    let pairs = storycast_media::pair_by_index(images, audios);
    if pairs.is_empty() {
        return Err(PipelineError::NoArtifacts { stage: "video" });
    }

    reset_dir(&dirs.clips_dir()).await?;

    let mut clips = Vec::new();
    for (idx, (image, audio)) in pairs.iter().enumerate() {
        info!("Building clip {}/{}", idx + 1, pairs.len());

        let frame = dirs.clips_dir().join(format!("frame_{}.jpg", idx));
        if let Err(e) = cover_resize(image, &frame, TARGET_WIDTH, TARGET_HEIGHT) {
            warn!("Skipping clip {}: unusable image {}: {}", idx, image.display(), e);
            continue;
        }

        let duration = duration_or_default(audio, DEFAULT_CLIP_SECS).await;

        let clip = dirs.clips_dir().join(format!("clip_{}.mp4", idx));
        match build_clip(&frame, audio, &clip, duration, encoding).await {
            Ok(()) => clips.push(clip),
            Err(e) => warn!("Skipping clip {}: {}", idx, e),
        }

        let _ = fs::remove_file(frame).await;
    }

    if clips.is_empty() {
        let _ = fs::remove_dir_all(dirs.clips_dir()).await;
        return Err(PipelineError::NoArtifacts { stage: "video" });
    }

    let result = concat_clips(&clips, &dirs.final_video()).await;
    let _ = fs::remove_dir_all(dirs.clips_dir()).await;
    result?;

    info!("Final video written: {}", dirs.final_video().display());
    Ok(())
}
