//! MFCC pipeline: framing, pre-emphasis, power spectrum, mel filterbank, log, DCT.

pub mod batch;
pub mod dct;
pub mod error;
pub(crate) mod fft;
pub mod filterbank;
pub mod processor;
pub mod scale;
pub mod spectrum;
pub mod stream;

pub use batch::{frame_count, mfcc_feats, split_signal, validate_settings};
pub use dct::{dct_ii, inverse_dct_ii};
pub use error::MfccError;
pub use filterbank::Filterbank;
pub use processor::FrameProcessor;
pub use scale::{hertz_to_mel, mel_to_hertz};
pub use spectrum::{log_floor, mel_coefs, power_spectrum, safe_log};
pub use stream::{MfccStream, StreamError, StreamWorker};
