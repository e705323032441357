//! Inference Engine - aligned row -> label + confidence
//!
//! The `Predictor` drives the whole per-request pipeline:
//! map -> reconcile -> gate -> (scale) -> classify -> confidence.
//! It holds only the read-only `ArtifactBundle`, so one instance can serve
//! any number of concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::{reconcile, FeatureMapper, InputRecord};

use super::artifacts::ArtifactBundle;
use super::classifier::{sigmoid, Classifier};
use super::gate::{self, ScalingDecision};
use super::label::{FaultLabel, LabelEncoding};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// The classifier or scaler failed on a well-formed row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

impl InferenceError {
    pub fn unsupported(kind: &str, capability: &str) -> Self {
        Self(format!("{} does not support {}", kind, capability))
    }
}

/// Terminal per-request failure. No partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Classifier or scaler absent; carries the message captured at load time
    #[error("{0}")]
    ArtifactUnavailable(String),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: FaultLabel,
    /// Probability of the Faulty class, 0.0 - 1.0
    pub probability_faulty: Option<f64>,
    /// Certainty in `label` (not in "Faulty"), 0.0 - 100.0
    pub confidence_percent: Option<f64>,
}

impl PredictionResult {
    pub fn new(label: FaultLabel, probability_faulty: Option<f64>) -> Self {
        Self {
            label,
            probability_faulty,
            confidence_percent: probability_faulty.map(|p| confidence_percent(label, p)),
        }
    }
}

/// Certainty in the returned label
pub fn confidence_percent(label: FaultLabel, probability_faulty: f64) -> f64 {
    match label {
        FaultLabel::Faulty => probability_faulty * 100.0,
        FaultLabel::Normal => (1.0 - probability_faulty) * 100.0,
    }
}

// ============================================================================
// CONFIDENCE EXTRACTION
// ============================================================================

/// Faulty column of a per-class probability row.
/// Fewer than two columns means the row carries no usable signal.
fn probability_from_columns(proba: &[f64], encoding: LabelEncoding) -> Option<f64> {
    if proba.len() < 2 {
        log::debug!("Probability output has {} column(s), ignoring", proba.len());
        return None;
    }
    encoding
        .faulty_column()
        .and_then(|column| proba.get(column).copied())
}

/// Logistic of the margin is the probability of class code 1
fn probability_from_score(score: f64, encoding: LabelEncoding) -> Option<f64> {
    if !score.is_finite() {
        log::debug!("Non-finite decision score {}, no probability", score);
        return None;
    }
    let p_one = sigmoid(score);
    match encoding.faulty_code() {
        1 => Some(p_one),
        0 => Some(1.0 - p_one),
        code => {
            log::warn!("Decision score cannot be mapped to Faulty code {}", code);
            None
        }
    }
}

/// Run the classifier on a prepared row.
///
/// Probability source, by capability: per-class probabilities, else the
/// logistic of the decision score, else none.
pub fn infer(
    classifier: &dyn Classifier,
    row: &[f64],
    encoding: LabelEncoding,
) -> Result<PredictionResult, InferenceError> {
    let capabilities = classifier.capabilities();

    let (raw, probability_faulty) = if capabilities.probability {
        let (raw, proba) = classifier.predict_with_probability(row)?;
        (raw, probability_from_columns(&proba, encoding))
    } else if capabilities.decision_score {
        let raw = classifier.predict(row)?;
        let score = classifier.decision_score(row)?;
        (raw, probability_from_score(score, encoding))
    } else {
        (classifier.predict(row)?, None)
    };

    Ok(PredictionResult::new(encoding.label_for(raw), probability_faulty))
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Per-request pipeline over an immutable artifact bundle
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: Arc<ArtifactBundle>,
    mapper: FeatureMapper,
}

impl Predictor {
    pub fn new(bundle: Arc<ArtifactBundle>) -> Self {
        Self {
            bundle,
            mapper: FeatureMapper::new(),
        }
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    pub fn predict(&self, record: &InputRecord) -> Result<PredictionResult, PipelineError> {
        let start_time = Instant::now();

        let classifier = self.bundle.classifier()?;
        let scaler = self.bundle.scaler()?;
        let schema = self.bundle.expected_schema();

        let features = self.mapper.map(record);
        let aligned = reconcile(&features, schema);

        let row = match gate::evaluate(Some(scaler), schema) {
            ScalingDecision::Apply => scaler.transform(aligned.as_slice())?,
            ScalingDecision::Bypass(reason) => {
                log::debug!("Scaler bypassed: {}", reason);
                aligned.values
            }
        };

        let result = infer(classifier, &row, self.bundle.label_encoding())?;

        log::debug!(
            "Predicted {} (p_faulty={:?}) from {} features in {}us",
            result.label,
            result.probability_faulty,
            row.len(),
            start_time.elapsed().as_micros()
        );

        Ok(result)
    }
}
