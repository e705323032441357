//! Central Configuration Constants
//!
//! Single source of truth for artifact file names and defaults.
//! The loader resolves every path below relative to the artifact root.

/// Directory holding the serialized model, scaler and label encoder
pub const DEFAULT_MODEL_DIR: &str = "ML_MODEL";

/// Serialized classifier (JSON export)
pub const MODEL_FILE: &str = "fault_prediction_model.json";

/// Serialized classifier (ONNX export, requires the `onnx` feature)
pub const ONNX_MODEL_FILE: &str = "fault_prediction_model.onnx";

/// Serialized standard scaler
pub const SCALER_FILE: &str = "scaler.json";

/// Sidecar feature-name list, tried under the root first and the model dir second
pub const FEATURE_LIST_FILE: &str = "feature_list.json";

/// Persisted target label encoder
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Class code the deployed service has always treated as "Faulty"
pub const DEFAULT_FAULTY_CODE: i64 = 1;

/// Decimal places of `probability_faulty` in the response
pub const PROBABILITY_DECIMALS: usize = 6;

/// Decimal places of `confidence_percent` in the response
pub const CONFIDENCE_DECIMALS: usize = 2;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
