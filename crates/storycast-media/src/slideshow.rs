//! Slideshow clip building and joining.
//!
//! One clip per image+audio pair: the image is looped for the audio's
//! duration, then all clips are joined in index order with the concat
//! demuxer.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use storycast_models::{extract_index, EncodingConfig};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_file;

/// List files in `dir` whose extension (case-insensitive) is in `exts`,
/// sorted by the first number embedded in the filename. Names without a
/// number sort last.
pub async fn list_media_files(dir: &Path, exts: &[&str]) -> MediaResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| exts.iter().any(|want| e.eq_ignore_ascii_case(want)))
            .unwrap_or(false);
        if matches && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }

    files.sort_by_key(|p| sort_key(p));
    Ok(files)
}

fn sort_key(path: &Path) -> (u64, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    (extract_index(&name).unwrap_or(u64::MAX), name)
}

/// Pair the Nth image with the Nth audio file, truncating to the shorter
/// list. Inputs are re-sorted by embedded index so callers can pass
/// unordered directory listings.
pub fn pair_by_index(
    mut images: Vec<PathBuf>,
    mut audios: Vec<PathBuf>,
) -> Vec<(PathBuf, PathBuf)> {
    images.sort_by_key(|p| sort_key(p));
    audios.sort_by_key(|p| sort_key(p));

    images.into_iter().zip(audios).collect()
}

/// Build one slideshow clip: still image looped for `duration_secs`,
/// muxed with the audio track.
pub async fn build_clip(
    image: &Path,
    audio: &Path,
    output: &Path,
    duration_secs: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    info!(
        "Building clip {} ({} + {}, {:.2}s)",
        output.display(),
        image.display(),
        audio.display(),
        duration_secs
    );

    let cmd = FfmpegCommand::new(output)
        .looped_image(image)
        .input(audio)
        .video_codec(&encoding.video_codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .duration(duration_secs)
        .pixel_format(&encoding.pixel_format)
        .frame_rate(encoding.fps);

    FfmpegRunner::new().run(&cmd).await
}

/// Join clips in order into `output`.
///
/// A single clip is moved through unchanged; several are joined with the
/// concat demuxer using stream copy. The concat list file is written next
/// to the output and removed afterward.
pub async fn concat_clips(clips: &[PathBuf], output: &Path) -> MediaResult<()> {
    match clips {
        [] => Err(MediaError::NothingToCombine(
            output.parent().unwrap_or(Path::new(".")).to_path_buf(),
        )),
        [single] => move_file(single, output).await,
        many => {
            let list_path = output.with_extension("concat.txt");
            let list = many
                .iter()
                .map(|clip| format!("file '{}'\n", clip.display()))
                .collect::<String>();
            fs::write(&list_path, list).await?;

            let cmd = FfmpegCommand::new(output)
                .input_with_args(&list_path, ["-f", "concat", "-safe", "0"])
                .codec_copy();

            let result = FfmpegRunner::new().run(&cmd).await;

            let _ = fs::remove_file(&list_path).await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_pairing_truncates_to_shorter_list() {
        let images = paths(&["output_0.jpg", "output_1.jpg", "output_2.jpg"]);
        let audios = paths(&["output_0.wav", "output_1.wav"]);

        let pairs = pair_by_index(images, audios);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_pairing_sorts_numerically_not_lexically() {
        let images = paths(&["output_10.jpg", "output_2.jpg", "output_1.jpg"]);
        let audios = paths(&["output_2.wav", "output_1.wav", "output_10.wav"]);

        let pairs = pair_by_index(images, audios);
        let indexes: Vec<_> = pairs
            .iter()
            .map(|(img, aud)| {
                (
                    extract_index(&img.to_string_lossy()).unwrap(),
                    extract_index(&aud.to_string_lossy()).unwrap(),
                )
            })
            .collect();

        assert_eq!(indexes, vec![(1, 1), (2, 2), (10, 10)]);
    }

    #[test]
    fn test_pairing_unnumbered_files_sort_last() {
        let images = paths(&["cover.jpg", "output_0.jpg"]);
        let audios = paths(&["output_0.wav", "output_1.wav"]);

        let pairs = pair_by_index(images, audios);
        assert_eq!(pairs[0].0, PathBuf::from("output_0.jpg"));
        assert_eq!(pairs[1].0, PathBuf::from("cover.jpg"));
    }

    #[tokio::test]
    async fn test_concat_rejects_empty_input() {
        let err = concat_clips(&[], Path::new("/tmp/final.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::NothingToCombine(_)));
    }

    #[tokio::test]
    async fn test_concat_single_clip_is_moved_through() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip_0.mp4");
        let output = dir.path().join("final.mp4");
        fs::write(&clip, b"fake clip bytes").await.unwrap();

        concat_clips(&[clip.clone()], &output).await.unwrap();

        assert!(!clip.exists());
        assert_eq!(fs::read(&output).await.unwrap(), b"fake clip bytes");
    }

    #[tokio::test]
    async fn test_list_media_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["output_3.wav", "output_0.wav", "notes.txt", "output_1.WAV"] {
            fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let files = list_media_files(dir.path(), &["wav"]).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["output_0.wav", "output_1.WAV", "output_3.wav"]);
    }
}
