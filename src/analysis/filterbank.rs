use super::scale::{hertz_to_mel, mel_to_hertz};

/// Triangular mel filters over the one-sided FFT bin grid.
///
/// Built once per (sample rate, filter count, FFT size) and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Filterbank {
    filters: Vec<Vec<f64>>,
    bins: usize,
    degenerate: usize,
}

impl Filterbank {
    /// Build `num_filters` filters, each `fft_size / 2 + 1` weights long.
    ///
    /// Grid points are equally spaced in mel from 0 up to the mel value of the
    /// full sample rate, and mapped to bins with the full transform size.
    /// Weights that would land beyond the stored half spectrum are dropped.
    pub fn new(sample_rate: f64, num_filters: usize, fft_size: usize) -> Self {
        let bins = fft_size / 2 + 1;
        let grid = grid_indices(sample_rate, num_filters, fft_size);
        let mut degenerate = 0usize;
        let filters = grid
            .windows(3)
            .map(|edges| {
                let (left, center, right) = (edges[0], edges[1], edges[2]);
                if left == center || center == right {
                    degenerate += 1;
                }
                build_tri_filter(left, center, right, bins)
            })
            .collect::<Vec<_>>();
        if degenerate > 0 {
            tracing::warn!(
                "{degenerate} of {num_filters} mel filters have an empty ramp \
                 (sample_rate={sample_rate}, fft_size={fft_size})"
            );
        }
        tracing::debug!(
            "Built mel filterbank: filters={}, bins={bins}, sample_rate={sample_rate}",
            filters.len()
        );
        Self {
            filters,
            bins,
            degenerate,
        }
    }

    /// Filter weight vectors, one per mel band.
    pub fn filters(&self) -> &[Vec<f64>] {
        &self.filters
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True when the bank holds no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Length of every filter (one-sided bin count).
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Count of filters whose rising or falling ramp collapsed to nothing.
    pub fn degenerate_filters(&self) -> usize {
        self.degenerate
    }
}

/// Bin index of each of the `num_filters + 2` mel grid points.
pub(crate) fn grid_indices(sample_rate: f64, num_filters: usize, fft_size: usize) -> Vec<usize> {
    let interval = hertz_to_mel(sample_rate) / (num_filters + 1) as f64;
    (0..num_filters + 2)
        .map(|i| {
            let hz = mel_to_hertz(interval * i as f64);
            freq_to_bin(hz, sample_rate, fft_size)
        })
        .collect()
}

fn freq_to_bin(freq_hz: f64, sample_rate: f64, fft_size: usize) -> usize {
    let bin = (freq_hz * fft_size as f64 / sample_rate).floor();
    if bin.is_finite() && bin > 0.0 {
        bin as usize
    } else {
        0
    }
}

fn build_tri_filter(left: usize, center: usize, right: usize, bins: usize) -> Vec<f64> {
    let mut weights = vec![0.0_f64; bins];
    if center > left {
        let span = (center - left) as f64;
        for bin in left..center.min(bins) {
            weights[bin] = (bin - left) as f64 / span;
        }
    }
    if let Some(peak) = weights.get_mut(center) {
        *peak = 1.0;
    }
    if right > center {
        let span = (right - center) as f64;
        for bin in (center + 1)..=right.min(bins.saturating_sub(1)) {
            weights[bin] = (right - bin) as f64 / span;
        }
    }
    weights
}
