//! Hertz / mel scale conversions (natural-log form).

const MEL_BREAK_HZ: f64 = 700.0;
const MEL_SCALE: f64 = 1127.0;

/// Convert a frequency in hertz to mels.
pub fn hertz_to_mel(freq_hz: f64) -> f64 {
    MEL_SCALE * (1.0 + freq_hz / MEL_BREAK_HZ).ln()
}

/// Convert a mel value back to hertz.
pub fn mel_to_hertz(mel: f64) -> f64 {
    MEL_BREAK_HZ * ((mel / MEL_SCALE).exp() - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(hertz_to_mel(0.0), 0.0);
        assert_eq!(mel_to_hertz(0.0), 0.0);
    }

    #[test]
    fn conversions_are_mutual_inverses() {
        for freq in [0.0, 1.0, 55.0, 440.0, 1_000.0, 4_000.0, 8_000.0, 22_050.0, 96_000.0] {
            let back = mel_to_hertz(hertz_to_mel(freq));
            assert!((back - freq).abs() < 1e-9 * freq.max(1.0), "{freq} -> {back}");
        }
    }

    #[test]
    fn thousand_hertz_is_close_to_thousand_mels() {
        let mel = hertz_to_mel(1_000.0);
        assert!((mel - 1_000.0).abs() < 1.0, "got {mel}");
    }

    #[test]
    fn mel_scale_is_monotonic() {
        let mut prev = hertz_to_mel(0.0);
        for step in 1..200 {
            let next = hertz_to_mel(step as f64 * 100.0);
            assert!(next > prev);
            prev = next;
        }
    }
}
