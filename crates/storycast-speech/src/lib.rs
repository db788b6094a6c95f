//! Script segmentation and speech synthesis.
//!
//! This crate provides:
//! - Sentence-aware segmentation with a hard per-segment character ceiling
//! - Synthesis through an external TTS command, degrading to a
//!   deterministic tone placeholder on failure
//! - WAV concatenation with silence gaps

pub mod error;
pub mod fallback;
pub mod segment;
pub mod synth;
pub mod wav;

pub use error::{SpeechError, SpeechResult};
pub use fallback::render_tone;
pub use segment::split_into_segments;
pub use synth::{Synthesizer, TtsConfig};
pub use wav::{concat_wavs, wav_duration};
