//! Label Encoding - which class code means "Faulty"
//!
//! The offline pipeline fits a label encoder on the `fault_status` strings.
//! An alphabetical encoder maps `Faulty` to 0, while the deployed service has
//! always treated 1 as Faulty. When the encoder is persisted next to the model
//! its ordering wins; otherwise the historical default applies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FAULTY_CODE;

/// Class name the encoder must contain
pub const FAULTY_CLASS: &str = "Faulty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultLabel {
    Normal,
    Faulty,
}

impl FaultLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultLabel::Normal => "Normal",
            FaultLabel::Faulty => "Faulty",
        }
    }
}

impl fmt::Display for FaultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted target encoder (`{"classes": ["Faulty", "Normal"]}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLabelEncoder {
    pub classes: Vec<String>,
}

/// Where the label encoding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingSource {
    Default,
    Persisted,
}

/// Mapping from raw class code to `FaultLabel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoding {
    faulty_code: i64,
    source: EncodingSource,
}

impl Default for LabelEncoding {
    fn default() -> Self {
        Self {
            faulty_code: DEFAULT_FAULTY_CODE,
            source: EncodingSource::Default,
        }
    }
}

impl LabelEncoding {
    /// Derive from a persisted encoder. The class code is the index in `classes`.
    pub fn from_encoder(encoder: &PersistedLabelEncoder) -> Result<Self, String> {
        let position = encoder
            .classes
            .iter()
            .position(|c| c == FAULTY_CLASS)
            .ok_or_else(|| format!("label encoder has no '{}' class: {:?}", FAULTY_CLASS, encoder.classes))?;

        Ok(Self {
            faulty_code: position as i64,
            source: EncodingSource::Persisted,
        })
    }

    pub fn faulty_code(&self) -> i64 {
        self.faulty_code
    }

    pub fn source(&self) -> EncodingSource {
        self.source
    }

    /// Whether this encoding disagrees with the historical 1 = Faulty
    pub fn differs_from_default(&self) -> bool {
        self.faulty_code != DEFAULT_FAULTY_CODE
    }

    pub fn label_for(&self, raw: i64) -> FaultLabel {
        if raw == self.faulty_code {
            FaultLabel::Faulty
        } else {
            FaultLabel::Normal
        }
    }

    /// Column of the Faulty class in a per-class probability row.
    /// Loaded classifiers carry classes `0..n`, so the code is the column.
    pub fn faulty_column(&self) -> Option<usize> {
        usize::try_from(self.faulty_code).ok()
    }
}
