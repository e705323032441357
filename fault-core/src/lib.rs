//! 5G Fault Prediction Core
//!
//! Turns a loosely specified telemetry record into the exact feature vector a
//! pre-trained Normal/Faulty classifier expects, runs the classifier and
//! derives a calibrated confidence signal from whatever it returns.
//!
//! # Pipeline
//!
//! ```text
//! InputRecord ─► FeatureMapper ─► reconcile ─► ScalingGate ─► Predictor ─► PredictionResponse
//!                                    ▲             ▲             ▲
//!                                    └──── ArtifactBundle (read-only, loaded once) ────┘
//! ```
//!
//! - `logic::features` - input record, canonical layout, mapping and schema alignment
//! - `logic::model` - artifact capabilities, loading, scaling gate, inference, response

pub mod constants;
pub mod logic;

pub use logic::features::{
    AlignedVector, ExpectedSchema, FeatureMapper, FeatureVector, InputRecord,
};
pub use logic::model::{
    ArtifactBundle, ArtifactLoader, FaultLabel, HealthReport, PipelineError,
    PredictionResponse, PredictionResult, Predictor,
};
