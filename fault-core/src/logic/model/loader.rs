//! Artifact Loader - read the bundle from disk once at startup
//!
//! Layout under the artifact root:
//!
//! ```text
//! <root>/feature_list.json                     (optional, tried first)
//! <root>/ML_MODEL/fault_prediction_model.json  (or .onnx with the `onnx` feature)
//! <root>/ML_MODEL/scaler.json
//! <root>/ML_MODEL/feature_list.json            (optional, tried second)
//! <root>/ML_MODEL/label_encoder.json           (optional)
//! ```
//!
//! Loading never fails as a whole. Each artifact that cannot be read is
//! recorded with its cause and reported when a prediction needs it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    APP_VERSION, DEFAULT_MODEL_DIR, FEATURE_LIST_FILE, LABEL_ENCODER_FILE, MODEL_FILE, SCALER_FILE,
};
use crate::logic::features::ExpectedSchema;

use super::artifacts::{Artifact, ArtifactBundle};
use super::classifier::{Classifier, Scaler};
use super::forest::{ForestClassifier, RandomForest};
use super::label::{LabelEncoding, PersistedLabelEncoder};
use super::linear::{LinearClassifier, LinearKind, LinearModel};
use super::scaler::StandardScaler;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime: {0}")]
    Onnx(String),
}

// ============================================================================
// SERIALIZED FORMATS
// ============================================================================

/// Classifier export, tagged by estimator type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LinearModel),
    LinearSvc(LinearModel),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ArtifactError> {
        let classifier: Arc<dyn Classifier> = match self {
            ModelArtifact::LogisticRegression(model) => Arc::new(
                LinearClassifier::new(LinearKind::LogisticRegression, model)
                    .map_err(ArtifactError::Invalid)?,
            ),
            ModelArtifact::LinearSvc(model) => Arc::new(
                LinearClassifier::new(LinearKind::LinearSvc, model).map_err(ArtifactError::Invalid)?,
            ),
            ModelArtifact::RandomForest(forest) => {
                Arc::new(ForestClassifier::new(forest).map_err(ArtifactError::Invalid)?)
            }
        };
        Ok(classifier)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Classifier from a JSON export
pub fn read_model(path: &Path) -> Result<Arc<dyn Classifier>, ArtifactError> {
    read_json::<ModelArtifact>(path)?.into_classifier()
}

/// Scaler from a JSON export
pub fn read_scaler(path: &Path) -> Result<Arc<dyn Scaler>, ArtifactError> {
    let scaler: StandardScaler = read_json(path)?;
    scaler.validate().map_err(ArtifactError::Invalid)?;
    Ok(Arc::new(scaler))
}

/// Sidecar feature-name list (JSON array of strings)
pub fn read_feature_list(path: &Path) -> Result<ExpectedSchema, ArtifactError> {
    read_json(path)
}

// ============================================================================
// LOADER
// ============================================================================

#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    root: PathBuf,
    model_dir: PathBuf,
}

impl ArtifactLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let model_dir = root.join(DEFAULT_MODEL_DIR);
        Self { root, model_dir }
    }

    /// Model directory, relative to the root unless absolute
    pub fn with_model_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.model_dir = self.root.join(dir);
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.model_dir.join(SCALER_FILE)
    }

    pub fn label_encoder_path(&self) -> PathBuf {
        self.model_dir.join(LABEL_ENCODER_FILE)
    }

    /// Sidecar locations, in priority order
    pub fn feature_list_candidates(&self) -> [PathBuf; 2] {
        [
            self.root.join(FEATURE_LIST_FILE),
            self.model_dir.join(FEATURE_LIST_FILE),
        ]
    }

    pub fn load(&self) -> ArtifactBundle {
        log::info!("Loading artifacts from {} (fault-core v{})", self.root.display(), APP_VERSION);

        let classifier = self.load_classifier();
        let scaler = capture("scaler", &self.scaler_path(), read_scaler(&self.scaler_path()));
        let schema = self.resolve_schema(classifier.as_loaded().map(Arc::as_ref));
        let encoding = self.load_label_encoding();

        match &schema {
            Some(schema) => log::info!(
                "Expected schema: {} features (layout hash {:08x})",
                schema.len(),
                schema.layout_hash()
            ),
            None => log::warn!("No expected feature schema found, columns will be sorted by name"),
        }

        ArtifactBundle::new(classifier, scaler)
            .with_expected_schema(schema)
            .with_label_encoding(encoding)
    }

    fn load_classifier(&self) -> Artifact<Arc<dyn Classifier>> {
        #[cfg(feature = "onnx")]
        {
            let onnx_path = self.model_dir.join(crate::constants::ONNX_MODEL_FILE);
            if onnx_path.exists() {
                let result = super::onnx::OnnxClassifier::load(&onnx_path)
                    .map(|c| Arc::new(c) as Arc<dyn Classifier>);
                return capture("model", &onnx_path, result);
            }
        }

        let path = self.model_path();
        capture("model", &path, read_model(&path))
    }

    /// Classifier-declared names first, then each sidecar location
    fn resolve_schema(&self, classifier: Option<&dyn Classifier>) -> Option<ExpectedSchema> {
        let declared = classifier
            .filter(|c| c.capabilities().feature_names)
            .and_then(|c| c.declared_feature_names())
            .map(ExpectedSchema::new);

        let sidecars = self.feature_list_candidates().into_iter().map(|path| {
            match read_feature_list(&path) {
                Ok(schema) => {
                    log::debug!("Feature list found at {}", path.display());
                    Some(schema)
                }
                Err(e) => {
                    log::debug!("No feature list at {}: {}", path.display(), e);
                    None
                }
            }
        });

        ExpectedSchema::resolve(std::iter::once(declared).chain(sidecars))
    }

    fn load_label_encoding(&self) -> LabelEncoding {
        let path = self.label_encoder_path();
        if !path.exists() {
            log::debug!("No label encoder at {}, Faulty = class 1", path.display());
            return LabelEncoding::default();
        }

        let encoding = read_json::<PersistedLabelEncoder>(&path)
            .map_err(|e| e.to_string())
            .and_then(|encoder| LabelEncoding::from_encoder(&encoder));

        match encoding {
            Ok(encoding) => {
                if encoding.differs_from_default() {
                    log::warn!(
                        "Label encoder maps Faulty to class {} (historical default is 1); using the encoder",
                        encoding.faulty_code()
                    );
                }
                encoding
            }
            Err(e) => {
                log::warn!("Ignoring label encoder {}: {}", path.display(), e);
                LabelEncoding::default()
            }
        }
    }
}

/// Keep a load result, turning a failure into its user-visible message
fn capture<T>(what: &str, path: &Path, result: Result<T, ArtifactError>) -> Artifact<T> {
    match result {
        Ok(value) => {
            log::info!("Loaded {} from {}", what, path.display());
            Artifact::Loaded(value)
        }
        Err(e) => {
            let message = format!("Failed to load {} from {}: {}", what, path.display(), e);
            log::error!("{}", message);
            Artifact::Failed(message)
        }
    }
}
