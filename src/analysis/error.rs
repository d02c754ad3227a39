use thiserror::Error;

/// Parameter validation failures, reported before any frame is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MfccError {
    /// Sample rate is not a positive, finite number.
    #[error("Invalid sample rate {sample_rate}: must be greater than zero")]
    InvalidSampleRate {
        /// Rejected sample rate.
        sample_rate: f64,
    },
    /// Window length is zero or longer than the signal.
    #[error("Invalid window length {window_length} for a signal of {signal_length} samples")]
    InvalidWindowLength {
        /// Rejected window length.
        window_length: usize,
        /// Length of the signal being framed.
        signal_length: usize,
    },
    /// Window stride is zero.
    #[error("Invalid window stride {window_stride}: must be greater than zero")]
    InvalidWindowStride {
        /// Rejected stride.
        window_stride: usize,
    },
    /// FFT size is zero.
    #[error("Invalid FFT size {fft_size}: must be greater than zero")]
    InvalidFftSize {
        /// Rejected FFT size.
        fft_size: usize,
    },
    /// Filter count is zero.
    #[error("Invalid filter count {num_filters}: must be greater than zero")]
    InvalidFilterCount {
        /// Rejected filter count.
        num_filters: usize,
    },
    /// Coefficient count is zero or exceeds what the filterbank can supply.
    ///
    /// With `energy` set, up to `num_filters` coefficients are available.
    /// Without it the DCT output at index 0 is fetched and dropped, so
    /// `num_coefs` must be strictly less than `num_filters` for every
    /// returned vector to hold `num_coefs` values.
    #[error(
        "Invalid coefficient count {num_coefs} for {num_filters} filters (energy slot: {energy})"
    )]
    InvalidCoefficientCount {
        /// Rejected coefficient count.
        num_coefs: usize,
        /// Filter count it was checked against.
        num_filters: usize,
        /// Whether coefficient 0 is replaced by log-energy.
        energy: bool,
    },
}
