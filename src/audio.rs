//! WAV decoding into mono `f64` signals.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hound::SampleFormat;
use thiserror::Error;

/// Errors that may occur while loading audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The file could not be opened or is not a valid WAV file.
    #[error("Invalid wav {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Decoder error.
        source: hound::Error,
    },
    /// A sample failed to decode.
    #[error("Sample error in {path}: {source}")]
    Sample {
        /// Path being decoded.
        path: PathBuf,
        /// Decoder error.
        source: hound::Error,
    },
}

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    /// Samples in [-1, 1].
    pub samples: Vec<f64>,
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Channel count of the source before downmixing.
    pub source_channels: u16,
}

impl MonoAudio {
    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file, scaling integer PCM to [-1, 1] and averaging channels.
pub fn load_wav_mono(path: &Path) -> Result<MonoAudio, AudioError> {
    let file = File::open(path).map_err(|err| AudioError::Open {
        path: path.to_path_buf(),
        source: hound::Error::IoError(err),
    })?;
    let mut reader =
        hound::WavReader::new(BufReader::new(file)).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let spec = reader.spec();
    let sample_error = |source| AudioError::Sample {
        path: path.to_path_buf(),
        source,
    };
    let interleaved = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from).map_err(sample_error))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << spec.bits_per_sample.saturating_sub(1)).max(1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|value| value as f64 / scale).map_err(sample_error))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    let samples = downmix_to_mono(&interleaved, spec.channels);
    tracing::debug!(
        "Loaded {} ({} Hz, {} ch, {} frames)",
        path.display(),
        spec.sample_rate,
        spec.channels,
        samples.len()
    );
    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
        source_channels: spec.channels,
    })
}

/// Average interleaved channels into one; a trailing partial frame is dropped.
pub fn downmix_to_mono(samples: &[f64], channels: u16) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().copied().map(sanitize_sample).sum::<f64>() / channels as f64)
        .collect()
}

fn sanitize_sample(sample: f64) -> f64 {
    if sample.is_finite() { sample } else { 0.0 }
}
