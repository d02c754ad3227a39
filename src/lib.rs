//! Mel-frequency cepstral coefficient extraction.
//!
//! [`analysis::mfcc_feats`] turns a whole signal into a coefficient matrix;
//! [`analysis::FrameProcessor`] and [`analysis::MfccStream`] process frames
//! one at a time while carrying pre-emphasis state between them.

/// Core MFCC pipeline.
pub mod analysis;
/// WAV input.
pub mod audio;
/// Extraction settings and TOML persistence.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Coefficient matrix output.
pub mod output;

pub use analysis::{FrameProcessor, MfccError, MfccStream, StreamWorker, mfcc_feats};
pub use config::{FeatureSettings, MfccConfig};
