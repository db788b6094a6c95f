//! Video encoding configuration.

use serde::{Deserialize, Serialize};

/// Output frame width in pixels.
pub const TARGET_WIDTH: u32 = 1280;

/// Output frame height in pixels.
pub const TARGET_HEIGHT: u32 = 720;

/// Clip duration used when the audio file's duration cannot be read.
pub const DEFAULT_CLIP_SECS: f64 = 3.0;

/// FFmpeg encoding parameters for slideshow clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    pub video_codec: String,
    /// Encoder preset
    pub preset: String,
    /// Constant rate factor (lower = higher quality)
    pub crf: u8,
    /// Audio codec (e.g., "aac")
    pub audio_codec: String,
    /// Audio bitrate (e.g., "192k")
    pub audio_bitrate: String,
    /// Output frame rate
    pub fps: u32,
    /// Pixel format for broad player compatibility
    pub pixel_format: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            fps: 30,
            pixel_format: "yuv420p".to_string(),
        }
    }
}
