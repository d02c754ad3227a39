//! Extraction settings and their TOML representation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-emphasis factor applied when none is configured explicitly.
pub const DEFAULT_PRE_EMPHASIS: f64 = 0.97;

/// Errors that may occur while loading or saving extraction settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a settings file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to write a settings file.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML settings.
    #[error("Invalid settings: {0}")]
    ParseToml(#[from] toml::de::Error),
    /// Failed to serialize settings to TOML.
    #[error("Failed to serialize settings: {0}")]
    SerializeToml(#[from] toml::ser::Error),
}

/// Per-processor options: log-energy substitution and pre-emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccConfig {
    /// Replace coefficient 0 with the log of the total frame energy.
    pub energy: bool,
    /// Pre-emphasis factor, or `None` to skip pre-emphasis.
    #[serde(with = "pre_emphasis_toml")]
    pub pre_emphasis: Option<f64>,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            energy: true,
            pre_emphasis: Some(DEFAULT_PRE_EMPHASIS),
        }
    }
}

/// Full parameter set for batch extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Sample rate in hertz.
    pub sample_rate: f64,
    /// Frame length in samples.
    pub window_length: usize,
    /// Hop between frame starts in samples.
    pub window_stride: usize,
    /// Complex FFT size; frames are truncated or zero-padded to it.
    pub fft_size: usize,
    /// Number of mel filters.
    pub num_filters: usize,
    /// Coefficients per frame.
    pub num_coefs: usize,
    /// Processor options.
    pub mfcc: MfccConfig,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000.0,
            window_length: 1024,
            window_stride: 512,
            fft_size: 512,
            num_filters: 20,
            num_coefs: 13,
            mfcc: MfccConfig::default(),
        }
    }
}

impl FeatureSettings {
    /// Parse settings from TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Render settings as TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded feature settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a TOML file, replacing any existing contents.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `pre_emphasis` is written as a number, or `false` when disabled.
mod pre_emphasis_toml {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::DEFAULT_PRE_EMPHASIS;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Factor(f64),
        Enabled(bool),
    }

    pub(super) fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let repr = match value {
            Some(factor) => Repr::Factor(*factor),
            None => Repr::Enabled(false),
        };
        repr.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Factor(factor) => Some(factor),
            Repr::Enabled(true) => Some(DEFAULT_PRE_EMPHASIS),
            Repr::Enabled(false) => None,
        })
    }
}
