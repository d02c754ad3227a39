//! Serialization of extracted coefficient matrices.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FeatureSettings;

/// Errors that may occur while writing a coefficient matrix.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Writing to the destination failed.
    #[error("Failed to write features: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding failed.
    #[error("Failed to encode features as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coefficient matrix with the settings that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccMatrix {
    /// Extraction parameters.
    pub settings: FeatureSettings,
    /// One coefficient vector per frame.
    pub frames: Vec<Vec<f64>>,
}

impl MfccMatrix {
    /// Bundle extracted frames with their settings.
    pub fn new(settings: FeatureSettings, frames: Vec<Vec<f64>>) -> Self {
        Self { settings, frames }
    }

    /// `(frames, coefficients)` shape of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        let cols = self.frames.first().map(Vec::len).unwrap_or(0);
        (self.frames.len(), cols)
    }

    /// Write pretty-printed JSON.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write one comma-separated line per frame.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        for frame in &self.frames {
            let line = frame
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> MfccMatrix {
        MfccMatrix::new(
            FeatureSettings::default(),
            vec![vec![1.0, -0.5, 2.25], vec![0.0, 3.0, -1.0]],
        )
    }

    #[test]
    fn csv_has_one_line_per_frame() {
        let mut out = Vec::new();
        matrix().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "1,-0.5,2.25\n0,3,-1\n");
    }

    #[test]
    fn json_round_trips() {
        let mut out = Vec::new();
        matrix().write_json(&mut out).unwrap();
        let parsed: MfccMatrix = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, matrix());
        assert_eq!(parsed.shape(), (2, 3));
    }
}
