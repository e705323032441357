//! Artifact Bundle - classifier, scaler, schema, label encoding
//!
//! Built once at startup and never mutated. A failed load is kept as a
//! message and only surfaces when a prediction actually needs the artifact.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::logic::features::ExpectedSchema;

use super::classifier::{Classifier, Scaler};
use super::inference::PipelineError;
use super::label::LabelEncoding;

/// One loadable artifact
#[derive(Debug, Clone)]
pub enum Artifact<T> {
    Loaded(T),
    /// Load attempted and failed; message captured for later requests
    Failed(String),
    /// Never provided
    Missing,
}

impl<T> Artifact<T> {
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Artifact::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The loaded value, or `ArtifactUnavailable` with the captured cause
    fn require(&self, missing: &str) -> Result<&T, PipelineError> {
        match self {
            Artifact::Loaded(value) => Ok(value),
            Artifact::Failed(message) => Err(PipelineError::ArtifactUnavailable(message.clone())),
            Artifact::Missing => Err(PipelineError::ArtifactUnavailable(missing.to_string())),
        }
    }
}

impl<T> From<Option<T>> for Artifact<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Artifact::Missing, Artifact::Loaded)
    }
}

/// Read-only inference context shared by every request
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    classifier: Artifact<Arc<dyn Classifier>>,
    scaler: Artifact<Arc<dyn Scaler>>,
    expected_schema: Option<ExpectedSchema>,
    label_encoding: LabelEncoding,
    loaded_at: DateTime<Utc>,
}

impl ArtifactBundle {
    pub fn new(
        classifier: Artifact<Arc<dyn Classifier>>,
        scaler: Artifact<Arc<dyn Scaler>>,
    ) -> Self {
        Self {
            classifier,
            scaler,
            expected_schema: None,
            label_encoding: LabelEncoding::default(),
            loaded_at: Utc::now(),
        }
    }

    /// Empty or absent schemas are stored as absent
    pub fn with_expected_schema(mut self, schema: Option<ExpectedSchema>) -> Self {
        self.expected_schema = schema.filter(|s| !s.is_empty());
        self
    }

    pub fn with_label_encoding(mut self, encoding: LabelEncoding) -> Self {
        self.label_encoding = encoding;
        self
    }

    pub fn classifier(&self) -> Result<&dyn Classifier, PipelineError> {
        let classifier = self.classifier.require("Model is not loaded.")?;
        Ok(classifier.as_ref())
    }

    pub fn scaler(&self) -> Result<&dyn Scaler, PipelineError> {
        let scaler = self.scaler.require("Scaler is not loaded.")?;
        Ok(scaler.as_ref())
    }

    pub fn expected_schema(&self) -> Option<&ExpectedSchema> {
        self.expected_schema.as_ref()
    }

    pub fn label_encoding(&self) -> LabelEncoding {
        self.label_encoding
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
