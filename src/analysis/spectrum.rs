use super::fft::FftPlan;
use super::filterbank::Filterbank;

/// Log value substituted for non-positive energies: `ln(f64::MIN_POSITIVE)`.
pub fn log_floor() -> f64 {
    f64::MIN_POSITIVE.ln()
}

/// Natural log that maps zero and negative input to [`log_floor`].
pub fn safe_log(value: f64) -> f64 {
    if value > 0.0 {
        value.ln()
    } else {
        log_floor()
    }
}

/// One-sided power spectrum of the first `fft_size` samples of `frame`.
///
/// Each of the `fft_size / 2 + 1` bins holds `(re² + im²) / fft_size`.
/// Frames shorter than `fft_size` are zero-padded. `fft_size` must be greater
/// than zero; a zero size yields an empty spectrum.
pub fn power_spectrum(frame: &[f64], fft_size: usize) -> Vec<f64> {
    let mut plan = FftPlan::new(fft_size);
    power_spectrum_with_plan(frame, &mut plan)
}

pub(crate) fn power_spectrum_with_plan(frame: &[f64], plan: &mut FftPlan) -> Vec<f64> {
    let fft_size = plan.len();
    let bins = fft_size / 2 + 1;
    let scale = fft_size.max(1) as f64;
    plan.forward_real(frame)
        .iter()
        .take(bins)
        .map(|c| (c.re * c.re + c.im * c.im) / scale)
        .collect()
}

/// Log mel-band energies: dot product of the spectrum with each filter, then [`safe_log`].
pub fn mel_coefs(power: &[f64], filterbank: &Filterbank) -> Vec<f64> {
    filterbank
        .filters()
        .iter()
        .map(|filter| {
            let energy: f64 = filter.iter().zip(power).map(|(w, p)| w * p).sum();
            safe_log(energy)
        })
        .collect()
}
