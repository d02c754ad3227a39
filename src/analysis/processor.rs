use super::dct::dct_ii;
use super::error::MfccError;
use super::fft::FftPlan;
use super::filterbank::Filterbank;
use super::spectrum::{mel_coefs, power_spectrum_with_plan, safe_log};
use crate::config::MfccConfig;

/// Stateful per-frame MFCC computation.
///
/// Frames must be fed in temporal order: pre-emphasis of each frame starts
/// from the last raw sample of the previous one. Use one processor per
/// independent signal or channel.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    sample_rate: f64,
    num_coefs: usize,
    config: MfccConfig,
    filterbank: Filterbank,
    plan: FftPlan,
    last_value: f64,
    emphasized: Vec<f64>,
}

impl FrameProcessor {
    /// Build a processor and its filterbank.
    pub fn new(
        sample_rate: f64,
        fft_size: usize,
        num_filters: usize,
        num_coefs: usize,
        config: MfccConfig,
    ) -> Result<Self, MfccError> {
        validate_processor(sample_rate, fft_size, num_filters, num_coefs, &config)?;
        Ok(Self::from_validated(
            sample_rate,
            fft_size,
            num_filters,
            num_coefs,
            config,
        ))
    }

    /// Build from parameters that already passed [`validate_processor`].
    pub(crate) fn from_validated(
        sample_rate: f64,
        fft_size: usize,
        num_filters: usize,
        num_coefs: usize,
        config: MfccConfig,
    ) -> Self {
        let filterbank = Filterbank::new(sample_rate, num_filters, fft_size);
        tracing::debug!(
            "FrameProcessor ready: sample_rate={sample_rate}, fft_size={fft_size}, \
             num_filters={num_filters}, num_coefs={num_coefs}, energy={}, pre_emphasis={:?}",
            config.energy,
            config.pre_emphasis
        );
        Self {
            sample_rate,
            num_coefs,
            config,
            filterbank,
            plan: FftPlan::new(fft_size),
            last_value: 0.0,
            emphasized: Vec::new(),
        }
    }

    /// Compute the coefficient vector for the next frame in the stream.
    pub fn process_frame(&mut self, frame: &[f64]) -> Vec<f64> {
        let power = match self.config.pre_emphasis {
            Some(factor) => {
                pre_emphasize_into(&mut self.emphasized, frame, factor, self.last_value);
                if let Some(&last) = frame.last() {
                    self.last_value = last;
                }
                power_spectrum_with_plan(&self.emphasized, &mut self.plan)
            }
            None => power_spectrum_with_plan(frame, &mut self.plan),
        };
        let mel = mel_coefs(&power, &self.filterbank);
        let mut coefs = dct_ii(&mel, true);
        if self.config.energy {
            coefs.truncate(self.num_coefs);
            coefs[0] = safe_log(power.iter().sum());
        } else {
            coefs.truncate(self.num_coefs + 1);
            coefs.remove(0);
        }
        tracing::trace!("Processed frame of {} samples", frame.len());
        coefs
    }

    /// Process frames sequentially, returning one coefficient vector per frame.
    pub fn process_frames<I, F>(&mut self, frames: I) -> Vec<Vec<f64>>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[f64]>,
    {
        frames
            .into_iter()
            .map(|frame| self.process_frame(frame.as_ref()))
            .collect()
    }

    /// Raw last sample of the previously processed frame (0 before the first).
    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    /// Sample rate the filterbank was built for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// FFT size applied to every frame.
    pub fn fft_size(&self) -> usize {
        self.plan.len()
    }

    /// Length of every returned coefficient vector.
    pub fn num_coefs(&self) -> usize {
        self.num_coefs
    }

    /// Processor options.
    pub fn config(&self) -> &MfccConfig {
        &self.config
    }

    /// The mel filterbank shared by all frames.
    pub fn filterbank(&self) -> &Filterbank {
        &self.filterbank
    }
}

pub(crate) fn validate_processor(
    sample_rate: f64,
    fft_size: usize,
    num_filters: usize,
    num_coefs: usize,
    config: &MfccConfig,
) -> Result<(), MfccError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(MfccError::InvalidSampleRate { sample_rate });
    }
    if fft_size == 0 {
        return Err(MfccError::InvalidFftSize { fft_size });
    }
    if num_filters == 0 {
        return Err(MfccError::InvalidFilterCount { num_filters });
    }
    // Without energy substitution one extra DCT output is fetched and dropped.
    let needed = if config.energy { num_coefs } else { num_coefs + 1 };
    if num_coefs == 0 || needed > num_filters {
        return Err(MfccError::InvalidCoefficientCount {
            num_coefs,
            num_filters,
            energy: config.energy,
        });
    }
    Ok(())
}

fn pre_emphasize_into(out: &mut Vec<f64>, frame: &[f64], factor: f64, previous: f64) {
    out.clear();
    out.reserve(frame.len());
    let mut prev = previous;
    for &sample in frame {
        out.push(sample - factor * prev);
        prev = sample;
    }
}
