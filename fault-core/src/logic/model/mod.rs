//! Model Module - artifacts & inference
//!
//! Keeps what the model is (capabilities, formats, loading) apart from how a
//! request is served (gate, inference, response). Swapping the exported model
//! type never touches the pipeline.

pub mod artifacts;
pub mod classifier;
pub mod forest;
pub mod gate;
pub mod health;
pub mod inference;
pub mod label;
pub mod linear;
pub mod loader;
pub mod response;
pub mod scaler;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifacts::{Artifact, ArtifactBundle};
pub use classifier::{Classifier, ClassifierCapabilities, Scaler};
pub use forest::{ForestClassifier, RandomForest};
pub use gate::{BypassReason, ScalingDecision};
pub use health::HealthReport;
pub use inference::{InferenceError, PipelineError, PredictionResult, Predictor};
pub use label::{FaultLabel, LabelEncoding, PersistedLabelEncoder};
pub use linear::{LinearClassifier, LinearKind, LinearModel};
pub use loader::{ArtifactError, ArtifactLoader, ModelArtifact};
pub use response::PredictionResponse;
pub use scaler::StandardScaler;

#[cfg(test)]
mod tests;
