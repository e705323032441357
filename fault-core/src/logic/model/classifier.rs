//! Artifact Capabilities - what a classifier or scaler can do
//!
//! Exported models differ in what they expose: a random forest has class
//! probabilities, a linear SVM only a decision score, some carry their column
//! names and some don't. Capabilities are fixed when the artifact is loaded;
//! the inference engine reads the flags instead of probing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::inference::InferenceError;

// ============================================================================
// CAPABILITIES
// ============================================================================

/// Optional outputs a classifier supports besides the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassifierCapabilities {
    /// `predict_probability` returns per-class probabilities
    pub probability: bool,
    /// `decision_score` returns a raw margin
    pub decision_score: bool,
    /// `declared_feature_names` returns the training columns
    pub feature_names: bool,
}

// ============================================================================
// TRAITS
// ============================================================================

/// Binary classifier over an aligned feature row.
///
/// Implementations must be safe for concurrent read-only invocation;
/// one instance serves every request.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Backend name for logs and health output
    fn kind(&self) -> &'static str;

    fn capabilities(&self) -> ClassifierCapabilities;

    /// Raw class code for one row
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;

    /// Per-class probabilities, columns ordered by class code
    fn predict_probability(&self, _features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError::unsupported(self.kind(), "predict_probability"))
    }

    /// Label and per-class probabilities from one evaluation.
    /// Backends whose single run yields both override this.
    fn predict_with_probability(&self, features: &[f64]) -> Result<(i64, Vec<f64>), InferenceError> {
        Ok((self.predict(features)?, self.predict_probability(features)?))
    }

    /// Signed margin, positive toward class code 1
    fn decision_score(&self, _features: &[f64]) -> Result<f64, InferenceError> {
        Err(InferenceError::unsupported(self.kind(), "decision_score"))
    }

    /// Column names the classifier was fit on, in order
    fn declared_feature_names(&self) -> Option<Vec<String>> {
        None
    }
}

/// Feature normalisation fit alongside the classifier
pub trait Scaler: Send + Sync + fmt::Debug {
    /// Number of columns the scaler was fit on, when it records one
    fn expected_feature_count(&self) -> Option<usize>;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

// ============================================================================
// HELPERS
// ============================================================================

/// Reject rows whose width differs from what an artifact was fit on
pub(crate) fn check_width(actual: usize, expected: usize, what: &str) -> Result<(), InferenceError> {
    if actual != expected {
        return Err(InferenceError(format!(
            "X has {} features, but {} is expecting {} features as input",
            actual, what, expected
        )));
    }
    Ok(())
}

/// Class codes must be `0..n` so a code doubles as its probability column
pub(crate) fn check_classes(classes: &[i64]) -> Result<(), String> {
    if classes.iter().zip(0i64..).any(|(code, expected)| *code != expected) {
        return Err(format!("classes must be label-encoded as 0..{}, found {:?}", classes.len(), classes));
    }
    Ok(())
}

/// Logistic function, maps a margin into (0, 1)
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}
