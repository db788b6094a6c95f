//! Tone-based placeholder audio.
//!
//! When real synthesis is unavailable the stage degrades to a short
//! deterministic tone sequence sized to the text's speaking time, so
//! downstream pairing and muxing always have an audio file to work with.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::SpeechResult;

/// Assumed narration speed for sizing placeholder clips.
const WORDS_PER_MINUTE: f64 = 150.0;

/// Shortest placeholder clip.
const MIN_TONE_SECS: f64 = 3.0;

const BASE_FREQ: f64 = 440.0;
const FREQ_STEP: f64 = 30.0;
const AMPLITUDE: f64 = 0.3;
const FADE_SECS: f64 = 0.1;
const MAX_TONES: usize = 8;

/// Placeholder duration for a piece of text, in seconds.
pub fn tone_duration_secs(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    (words as f64 / WORDS_PER_MINUTE * 60.0).max(MIN_TONE_SECS)
}

/// Render a deterministic tone placeholder for `text` as 16-bit mono WAV.
///
/// One decaying sine tone per word (capped at eight), frequency stepping
/// up per word, with fade in/out at the edges. Same text, same bytes.
pub fn render_tone(text: &str, dest: &Path, sample_rate: u32) -> SpeechResult<()> {
    let duration = tone_duration_secs(text);
    let total_samples = (sample_rate as f64 * duration) as usize;
    let word_count = text.split_whitespace().count().max(1);

    let mut samples = vec![0.0f64; total_samples];
    let tone_len = total_samples / word_count;

    for tone in 0..word_count.min(MAX_TONES) {
        let start = tone * tone_len;
        let end = ((tone + 1) * tone_len).min(total_samples);
        let freq = BASE_FREQ + tone as f64 * FREQ_STEP;

        for (offset, sample) in samples[start..end].iter_mut().enumerate() {
            let t = offset as f64 / sample_rate as f64;
            *sample = AMPLITUDE * (2.0 * std::f64::consts::PI * freq * t).sin() * (-2.0 * t).exp();
        }
    }

    apply_fades(&mut samples, (FADE_SECS * sample_rate as f64) as usize);

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(dest, spec)?;
    for sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    Ok(())
}

fn apply_fades(samples: &mut [f64], fade_len: usize) {
    let fade_len = fade_len.min(samples.len() / 2);
    if fade_len == 0 {
        return;
    }

    let total = samples.len();
    for i in 0..fade_len {
        let gain = i as f64 / fade_len as f64;
        samples[i] *= gain;
        samples[total - 1 - i] *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_duration_floor() {
        // one word is far below the three second floor
        assert!((tone_duration_secs("word") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tone_duration_scales_with_words() {
        let text = vec!["word"; 300].join(" ");
        // 300 words at 150 wpm is two minutes
        assert!((tone_duration_secs(&text) - 120.0).abs() < 0.001);
    }

    #[test]
    fn test_render_tone_writes_expected_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        render_tone("five words of test text", &path, 24_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);
        // five words floor to the three second minimum
        assert_eq!(reader.duration(), 3 * 24_000);
    }

    #[test]
    fn test_render_tone_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");

        render_tone("same text both times", &a, 24_000).unwrap();
        render_tone("same text both times", &b, 24_000).unwrap();

        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_fade_zeroes_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fade.wav");
        render_tone("fade test words here", &path, 24_000).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let first: i16 = reader.samples::<i16>().next().unwrap().unwrap();
        assert_eq!(first, 0);
    }
}
