//! WAV reading and concatenation.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::warn;

use crate::error::{SpeechError, SpeechResult};

/// Silence inserted between concatenated segments.
const GAP_SECS: f64 = 0.1;

/// Duration of a WAV file in seconds.
pub fn wav_duration(path: impl AsRef<Path>) -> SpeechResult<f64> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

fn read_samples(path: &Path) -> SpeechResult<(WavSpec, Vec<i16>)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok((spec, samples))
}

/// Concatenate WAV files into `dest` with a short silence gap between
/// them. A single input is copied through. Inputs that fail to read are
/// skipped; all inputs unreadable is an error.
///
/// The output uses the first readable input's channel count and sample
/// rate as 16-bit PCM; later inputs with a different rate are carried
/// over as-is after a warning (matching the lenient source behavior).
pub fn concat_wavs(inputs: &[impl AsRef<Path>], dest: &Path) -> SpeechResult<()> {
    if inputs.len() == 1 {
        std::fs::copy(inputs[0].as_ref(), dest)?;
        return Ok(());
    }

    let mut writer: Option<WavWriter<_>> = None;
    let mut out_spec: Option<WavSpec> = None;

    for input in inputs {
        let input = input.as_ref();
        let (spec, samples) = match read_samples(input) {
            Ok(read) => read,
            Err(e) => {
                warn!("Skipping unreadable segment {}: {}", input.display(), e);
                continue;
            }
        };

        if writer.is_none() {
            let spec_out = WavSpec {
                channels: spec.channels,
                sample_rate: spec.sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let mut w = WavWriter::create(dest, spec_out)?;
            for sample in samples {
                w.write_sample(sample)?;
            }
            writer = Some(w);
            out_spec = Some(spec_out);
        } else {
            let w = writer.as_mut().expect("checked above");
            let spec_out = out_spec.expect("writer implies spec");
            if spec.sample_rate != spec_out.sample_rate {
                warn!(
                    "Sample rate mismatch in {}: {} != {}",
                    input.display(),
                    spec.sample_rate,
                    spec_out.sample_rate
                );
            }
            let gap =
                (GAP_SECS * spec_out.sample_rate as f64) as usize * spec_out.channels as usize;
            for _ in 0..gap {
                w.write_sample(0i16)?;
            }
            for sample in samples {
                w.write_sample(sample)?;
            }
        }
    }

    match writer {
        Some(w) => {
            w.finalize()?;
            Ok(())
        }
        None => Err(SpeechError::synthesis_failed(
            "no readable segments to concatenate",
        )),
    }
}
