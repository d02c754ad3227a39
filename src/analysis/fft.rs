use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// A planned forward complex FFT of a fixed size, plus reusable buffers.
pub(crate) struct FftPlan {
    len: usize,
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl FftPlan {
    pub(crate) fn new(len: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(len);
        let scratch = vec![Complex64::default(); fft.get_inplace_scratch_len()];
        Self {
            len,
            fft,
            buffer: vec![Complex64::default(); len],
            scratch,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Transform the first `len` samples of `frame`, zero-padding short input.
    ///
    /// The returned slice holds all `len` complex bins.
    pub(crate) fn forward_real(&mut self, frame: &[f64]) -> &[Complex64] {
        for (i, cell) in self.buffer.iter_mut().enumerate() {
            let re = frame.get(i).copied().unwrap_or(0.0);
            *cell = Complex64::new(re, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        &self.buffer
    }
}

impl Clone for FftPlan {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            fft: Arc::clone(&self.fft),
            buffer: vec![Complex64::default(); self.len],
            scratch: vec![Complex64::default(); self.scratch.len()],
        }
    }
}

impl fmt::Debug for FftPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlan").field("len", &self.len).finish()
    }
}
