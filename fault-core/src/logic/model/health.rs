//! Health Report - artifact status for operators and dashboards
//!
//! Not used by the inference path itself.

use serde::{Deserialize, Serialize};

use super::artifacts::ArtifactBundle;
use super::gate;
use super::label::EncodingSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub expected_feature_count: usize,
    pub scaler_feature_count: Option<usize>,
    pub scaler_compatible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_layout_hash: Option<u32>,
    pub faulty_class_code: i64,
    pub label_encoding_source: EncodingSource,
}

impl HealthReport {
    pub fn from_bundle(bundle: &ArtifactBundle) -> Self {
        let classifier = bundle.classifier().ok();
        let scaler = bundle.scaler().ok();
        let schema = bundle.expected_schema();
        let encoding = bundle.label_encoding();

        Self {
            status: "ok".to_string(),
            model_loaded: classifier.is_some(),
            scaler_loaded: scaler.is_some(),
            expected_feature_count: schema.map_or(0, |s| s.len()),
            scaler_feature_count: scaler.and_then(|s| s.expected_feature_count()),
            scaler_compatible: gate::evaluate(scaler, schema).should_apply(),
            classifier_kind: classifier.map(|c| c.kind().to_string()),
            feature_layout_hash: schema.map(|s| s.layout_hash()),
            faulty_class_code: encoding.faulty_code(),
            label_encoding_source: encoding.source(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::logic::features::ExpectedSchema;
    use crate::logic::model::{Artifact, Scaler, StandardScaler};

    fn scaler(n: usize) -> Artifact<Arc<dyn Scaler>> {
        Artifact::Loaded(Arc::new(StandardScaler::new(vec![0.0; n], vec![1.0; n])))
    }

    #[test]
    fn test_nothing_loaded() {
        let bundle = ArtifactBundle::new(Artifact::Failed("boom".into()), Artifact::Missing);
        let report = HealthReport::from_bundle(&bundle);

        assert_eq!(report.status, "ok");
        assert!(!report.model_loaded);
        assert!(!report.scaler_loaded);
        assert_eq!(report.expected_feature_count, 0);
        assert_eq!(report.scaler_feature_count, None);
        assert!(!report.scaler_compatible);
        assert_eq!(report.feature_layout_hash, None);
    }

    #[test]
    fn test_compatible_scaler() {
        let schema = ExpectedSchema::new(["a", "b", "c"]);
        let bundle = ArtifactBundle::new(Artifact::Missing, scaler(3))
            .with_expected_schema(Some(schema.clone()));
        let report = HealthReport::from_bundle(&bundle);

        assert!(report.scaler_loaded);
        assert_eq!(report.expected_feature_count, 3);
        assert_eq!(report.scaler_feature_count, Some(3));
        assert!(report.scaler_compatible);
        assert_eq!(report.feature_layout_hash, Some(schema.layout_hash()));
    }

    #[test]
    fn test_incompatible_scaler() {
        let bundle = ArtifactBundle::new(Artifact::Missing, scaler(4))
            .with_expected_schema(Some(ExpectedSchema::new(["a", "b", "c"])));
        assert!(!HealthReport::from_bundle(&bundle).scaler_compatible);

        // No schema: nothing to be compatible with
        let bundle = ArtifactBundle::new(Artifact::Missing, scaler(4));
        assert!(!HealthReport::from_bundle(&bundle).scaler_compatible);
    }
}
