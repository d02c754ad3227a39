use super::error::MfccError;
use super::processor::{FrameProcessor, validate_processor};
use crate::config::FeatureSettings;

/// Slice `signal` into overlapping frames of `window_length` samples.
///
/// Produces `(len - window_length) / window_stride + 1` frames, frame `i`
/// starting at `i * window_stride`. Parameters are validated first.
pub fn split_signal(
    signal: &[f64],
    window_length: usize,
    window_stride: usize,
) -> Result<Vec<&[f64]>, MfccError> {
    validate_window(signal.len(), window_length, window_stride)?;
    Ok(slice_frames(signal, window_length, window_stride))
}

/// Number of frames [`split_signal`] yields, or `None` when the window does not fit.
pub fn frame_count(signal_len: usize, window_length: usize, window_stride: usize) -> Option<usize> {
    if window_length == 0 || window_stride == 0 || window_length > signal_len {
        return None;
    }
    Some((signal_len - window_length) / window_stride + 1)
}

fn slice_frames(signal: &[f64], window_length: usize, window_stride: usize) -> Vec<&[f64]> {
    let count = frame_count(signal.len(), window_length, window_stride).unwrap_or(0);
    (0..count)
        .map(|i| {
            let start = i * window_stride;
            &signal[start..start + window_length]
        })
        .collect()
}

/// Validate every batch parameter against a signal of `signal_len` samples.
pub fn validate_settings(settings: &FeatureSettings, signal_len: usize) -> Result<(), MfccError> {
    if !(settings.sample_rate.is_finite() && settings.sample_rate > 0.0) {
        return Err(MfccError::InvalidSampleRate {
            sample_rate: settings.sample_rate,
        });
    }
    validate_window(signal_len, settings.window_length, settings.window_stride)?;
    validate_processor(
        settings.sample_rate,
        settings.fft_size,
        settings.num_filters,
        settings.num_coefs,
        &settings.mfcc,
    )
}

fn validate_window(
    signal_len: usize,
    window_length: usize,
    window_stride: usize,
) -> Result<(), MfccError> {
    if window_length == 0 || window_length > signal_len {
        return Err(MfccError::InvalidWindowLength {
            window_length,
            signal_length: signal_len,
        });
    }
    if window_stride == 0 {
        return Err(MfccError::InvalidWindowStride { window_stride });
    }
    Ok(())
}

/// Compute the `[frames × num_coefs]` MFCC matrix of a whole signal.
///
/// Fails before any frame is processed if a parameter is invalid.
pub fn mfcc_feats(signal: &[f64], settings: &FeatureSettings) -> Result<Vec<Vec<f64>>, MfccError> {
    validate_settings(settings, signal.len())?;
    let frames = slice_frames(signal, settings.window_length, settings.window_stride);
    let mut processor = FrameProcessor::from_validated(
        settings.sample_rate,
        settings.fft_size,
        settings.num_filters,
        settings.num_coefs,
        settings.mfcc,
    );
    tracing::debug!(
        "Extracting MFCCs: samples={}, frames={}, num_coefs={}",
        signal.len(),
        frames.len(),
        settings.num_coefs
    );
    Ok(processor.process_frames(frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_signal_counts_and_offsets() {
        let signal: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let frames = split_signal(&signal, 4, 3).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(frames[1], &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(frames[2], &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn split_signal_exact_fit_yields_one_frame() {
        let signal = vec![0.5; 8];
        let frames = split_signal(&signal, 8, 100).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 8);
    }

    #[test]
    fn frame_count_matches_formula() {
        for (len, w, s) in [(16_000, 1024, 512), (1000, 100, 7), (33, 33, 1), (50, 10, 10)] {
            let signal = vec![0.0; len];
            let frames = split_signal(&signal, w, s).unwrap();
            assert_eq!(frames.len(), (len - w) / s + 1);
            assert_eq!(Some(frames.len()), frame_count(len, w, s));
            assert!(frames.iter().all(|f| f.len() == w));
        }
        assert_eq!(frame_count(10, 11, 1), None);
    }

    #[test]
    fn split_signal_rejects_bad_windows() {
        let signal = vec![0.0; 10];
        assert!(matches!(
            split_signal(&signal, 11, 1),
            Err(MfccError::InvalidWindowLength {
                window_length: 11,
                signal_length: 10
            })
        ));
        assert!(matches!(
            split_signal(&signal, 0, 1),
            Err(MfccError::InvalidWindowLength { .. })
        ));
        assert!(matches!(
            split_signal(&signal, 4, 0),
            Err(MfccError::InvalidWindowStride { .. })
        ));
    }

    #[test]
    fn validation_reports_each_failure() {
        let base = FeatureSettings::default();
        let len = 16_000;
        assert!(validate_settings(&base, len).is_ok());

        let cases = [
            (FeatureSettings { sample_rate: -1.0, ..base }, "sample"),
            (FeatureSettings { window_length: 2000, ..base }, "length"),
            (FeatureSettings { window_stride: 0, ..base }, "stride"),
            (FeatureSettings { num_filters: 0, ..base }, "filters"),
            (FeatureSettings { num_coefs: 25, ..base }, "coefs"),
            (FeatureSettings { fft_size: 0, ..base }, "fft"),
        ];
        for (settings, label) in cases {
            let signal_len = if label == "length" { 1000 } else { len };
            let err = validate_settings(&settings, signal_len).unwrap_err();
            let ok = match label {
                "sample" => matches!(err, MfccError::InvalidSampleRate { .. }),
                "length" => matches!(err, MfccError::InvalidWindowLength { .. }),
                "stride" => matches!(err, MfccError::InvalidWindowStride { .. }),
                "filters" => matches!(err, MfccError::InvalidFilterCount { .. }),
                "coefs" => matches!(err, MfccError::InvalidCoefficientCount { .. }),
                _ => matches!(err, MfccError::InvalidFftSize { .. }),
            };
            assert!(ok, "{label}: {err}");
        }
    }

    #[test]
    fn mfcc_feats_shape() {
        let signal: Vec<f64> = (0..16_000).map(|n| (n as f64 * 0.05).sin() * 0.5).collect();
        let feats = mfcc_feats(&signal, &FeatureSettings::default()).unwrap();
        assert_eq!(feats.len(), 30);
        assert!(feats.iter().all(|row| row.len() == 13));
        assert!(feats.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn mfcc_feats_matches_manual_framing() {
        let signal: Vec<f64> = (0..4_000).map(|n| (n as f64 * 0.11).sin() * 0.3).collect();
        let settings = FeatureSettings {
            window_length: 400,
            window_stride: 160,
            ..FeatureSettings::default()
        };
        let mut processor = FrameProcessor::new(
            settings.sample_rate,
            settings.fft_size,
            settings.num_filters,
            settings.num_coefs,
            settings.mfcc,
        )
        .unwrap();
        let frames = split_signal(&signal, 400, 160).unwrap();
        let expected = processor.process_frames(frames);
        assert_eq!(mfcc_feats(&signal, &settings).unwrap(), expected);
    }

    #[test]
    fn mfcc_feats_rejects_full_coefficient_count_without_energy() {
        let signal = vec![0.1; 16_000];
        let settings = FeatureSettings {
            num_coefs: 20,
            num_filters: 20,
            mfcc: crate::config::MfccConfig {
                energy: false,
                ..Default::default()
            },
            ..FeatureSettings::default()
        };
        assert_eq!(
            mfcc_feats(&signal, &settings).unwrap_err(),
            MfccError::InvalidCoefficientCount {
                num_coefs: 20,
                num_filters: 20,
                energy: false
            }
        );
        let with_energy = FeatureSettings {
            mfcc: Default::default(),
            ..settings
        };
        assert!(mfcc_feats(&signal, &with_energy).is_ok());
    }
}
