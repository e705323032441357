//! ONNX Classifier - sklearn pipelines exported with skl2onnx
//!
//! Output 0 is the int64 label, output 1 (when present, exported with
//! `zipmap=False`) the float per-class probabilities. Training column names
//! are read from the `feature_names` custom metadata entry, either a JSON
//! array or a comma-separated list.

use std::fmt;
use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::classifier::{Classifier, ClassifierCapabilities};
use super::inference::InferenceError;
use super::loader::ArtifactError;

/// Metadata key holding the training column names
pub const FEATURE_NAMES_KEY: &str = "feature_names";

pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    label_output: String,
    probability_output: Option<String>,
    feature_names: Option<Vec<String>>,
}

impl fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("label_output", &self.label_output)
            .field("probability_output", &self.probability_output)
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

/// Parse `feature_names` metadata: JSON array or comma-separated
pub fn parse_feature_names(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self, ArtifactError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| ArtifactError::Onnx(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::Onnx(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ArtifactError::Onnx(format!("Failed to load model: {}", e)))?;

        let mut outputs = session.outputs.iter().map(|o| o.name.clone());
        let label_output = outputs
            .next()
            .ok_or_else(|| ArtifactError::Invalid("model defines no outputs".to_string()))?;
        let probability_output = outputs.next();

        let feature_names = session
            .metadata()
            .ok()
            .and_then(|meta| meta.custom(FEATURE_NAMES_KEY).ok().flatten())
            .map(|raw| parse_feature_names(&raw))
            .filter(|names| !names.is_empty());

        log::info!(
            "ONNX model loaded (label output '{}', probability output {:?}, {} declared features)",
            label_output,
            probability_output,
            feature_names.as_ref().map_or(0, Vec::len)
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            probability_output,
            feature_names,
        })
    }

    /// One session run: (label, probabilities if exported)
    fn run(&self, features: &[f64]) -> Result<(i64, Option<Vec<f64>>), InferenceError> {
        let row: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), row)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let label = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.label_output)))?;
        let (_, labels) = label
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
        let raw = *labels
            .first()
            .ok_or_else(|| InferenceError("Empty label output".to_string()))?;

        let proba = match &self.probability_output {
            Some(name) => {
                let output = outputs
                    .get(name)
                    .ok_or_else(|| InferenceError(format!("No output '{}'", name)))?;
                let (_, data) = output
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
                Some(data.iter().map(|p| *p as f64).collect())
            }
            None => None,
        };

        Ok((raw, proba))
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "ONNX"
    }

    fn capabilities(&self) -> ClassifierCapabilities {
        ClassifierCapabilities {
            probability: self.probability_output.is_some(),
            decision_score: false,
            feature_names: self.feature_names.is_some(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        self.run(features).map(|(label, _)| label)
    }

    fn predict_probability(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        self.predict_with_probability(features).map(|(_, proba)| proba)
    }

    fn predict_with_probability(&self, features: &[f64]) -> Result<(i64, Vec<f64>), InferenceError> {
        match self.run(features)? {
            (label, Some(proba)) => Ok((label, proba)),
            (_, None) => Err(InferenceError::unsupported(self.kind(), "predict_probability")),
        }
    }

    fn declared_feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }
}
