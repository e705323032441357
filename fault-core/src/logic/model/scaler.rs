//! Standard Scaler - `(x - mean) / scale`
//!
//! Either statistic may be absent (fit with `with_mean=False` or
//! `with_std=False`); the missing step is skipped.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use super::classifier::{check_width, Scaler};
use super::inference::InferenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    pub n_features_in: Option<usize>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        let n = mean.len();
        Self {
            mean: Some(mean),
            scale: Some(scale),
            n_features_in: Some(n),
        }
    }

    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        let lengths: Vec<usize> = [self.mean.as_ref(), self.scale.as_ref()]
            .into_iter()
            .flatten()
            .map(Vec::len)
            .chain(self.n_features_in)
            .collect();

        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(format!(
                "inconsistent scaler dimensions (mean: {:?}, scale: {:?}, n_features_in: {:?})",
                self.mean.as_ref().map(Vec::len),
                self.scale.as_ref().map(Vec::len),
                self.n_features_in
            ));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn expected_feature_count(&self) -> Option<usize> {
        self.n_features_in
            .or_else(|| self.mean.as_ref().map(Vec::len))
            .or_else(|| self.scale.as_ref().map(Vec::len))
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if let Some(expected) = self.expected_feature_count() {
            check_width(features.len(), expected, "StandardScaler")?;
        }

        let mut x = Array1::from(features.to_vec());
        if let Some(mean) = &self.mean {
            check_width(features.len(), mean.len(), "StandardScaler")?;
            x -= &ArrayView1::from(&mean[..]);
        }
        if let Some(scale) = &self.scale {
            check_width(features.len(), scale.len(), "StandardScaler")?;
            // Constant columns were fit with zero variance
            let scale: Array1<f64> = scale.iter().map(|s| if *s == 0.0 { 1.0 } else { *s }).collect();
            x /= &scale;
        }

        Ok(x.to_vec())
    }
}
