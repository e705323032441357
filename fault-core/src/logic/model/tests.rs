//! Integration Tests for the Prediction Pipeline
//!
//! Drives `Predictor` end to end with in-memory artifacts.

#[cfg(test)]
mod integration_tests {
    use std::sync::{Arc, Mutex};

    use crate::logic::features::{ExpectedSchema, InputRecord};
    use crate::logic::model::{
        Artifact, ArtifactBundle, Classifier, ClassifierCapabilities, FaultLabel,
        InferenceError, PipelineError, PredictionResponse, Predictor, Scaler, StandardScaler,
    };
    use serde_json::json;

    /// Records the row it was given, predicts a fixed code
    #[derive(Debug, Default)]
    struct RecordingClassifier {
        code: i64,
        proba: Option<Vec<f64>>,
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl RecordingClassifier {
        fn new(code: i64, proba: Option<Vec<f64>>) -> Self {
            Self {
                code,
                proba,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_row(&self) -> Vec<f64> {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl Classifier for RecordingClassifier {
        fn kind(&self) -> &'static str {
            "Recording"
        }

        fn capabilities(&self) -> ClassifierCapabilities {
            ClassifierCapabilities {
                probability: self.proba.is_some(),
                ..Default::default()
            }
        }

        fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
            self.seen.lock().unwrap().push(features.to_vec());
            Ok(self.code)
        }

        fn predict_probability(&self, _features: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.proba.clone().unwrap_or_default())
        }
    }

    /// Fails every call
    #[derive(Debug)]
    struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn kind(&self) -> &'static str {
            "Broken"
        }

        fn capabilities(&self) -> ClassifierCapabilities {
            ClassifierCapabilities::default()
        }

        fn predict(&self, _features: &[f64]) -> Result<i64, InferenceError> {
            Err(InferenceError("internal numeric error".into()))
        }
    }

    fn record() -> InputRecord {
        InputRecord::new(-75.0, 18.0, 95.0, 15.0, 3.0, 0.5)
    }

    fn identity_scaler(n: usize) -> Artifact<Arc<dyn Scaler>> {
        Artifact::Loaded(Arc::new(StandardScaler::new(vec![0.0; n], vec![1.0; n])))
    }

    fn predictor(classifier: Arc<dyn Classifier>, scaler: Artifact<Arc<dyn Scaler>>) -> Predictor {
        Predictor::new(Arc::new(ArtifactBundle::new(Artifact::Loaded(classifier), scaler)))
    }

    #[test]
    fn test_scenario_label_only() {
        let clf = Arc::new(RecordingClassifier::new(0, None));
        let predictor = predictor(clf.clone(), identity_scaler(8));

        let result = predictor.predict(&record()).unwrap();
        let response = PredictionResponse::from(&result);

        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"prediction": "Normal"}));
        // No schema: 6 renamed + 2 engineered, sorted by name, unscaled
        let row = clf.last_row();
        assert_eq!(row.len(), 8);
        assert_eq!(row[0], 95.0 / 16.0); // efficiency_score
    }

    #[test]
    fn test_scenario_probability() {
        let clf = Arc::new(RecordingClassifier::new(1, Some(vec![0.2, 0.8])));
        let predictor = predictor(clf, identity_scaler(8));

        let response = PredictionResponse::from(predictor.predict(&record()).unwrap());

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"prediction": "Faulty", "probability_faulty": 0.8, "confidence_percent": 80.0})
        );
    }

    #[test]
    fn test_schema_aligned_row_reaches_classifier() {
        let clf = Arc::new(RecordingClassifier::new(0, None));
        let bundle = ArtifactBundle::new(Artifact::Loaded(clf.clone()), identity_scaler(2))
            .with_expected_schema(Some(ExpectedSchema::new(["latency_ms", "active_users", "rssi_dbm"])));

        Predictor::new(Arc::new(bundle)).predict(&record()).unwrap();

        // Scaler fit on 2 columns, schema has 3: bypassed, raw values
        assert_eq!(clf.last_row(), vec![15.0, 0.0, -75.0]);
    }

    #[test]
    fn test_compatible_scaler_is_applied() {
        let clf = Arc::new(RecordingClassifier::new(0, None));
        let scaler: Arc<dyn Scaler> = Arc::new(StandardScaler::new(vec![10.0, -80.0], vec![5.0, 5.0]));
        let bundle = ArtifactBundle::new(Artifact::Loaded(clf.clone()), Artifact::Loaded(scaler))
            .with_expected_schema(Some(ExpectedSchema::new(["latency_ms", "rssi_dbm"])));

        Predictor::new(Arc::new(bundle)).predict(&record()).unwrap();

        assert_eq!(clf.last_row(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_missing_classifier_fails_without_payload() {
        let bundle = ArtifactBundle::new(
            Artifact::Failed("Failed to load model from ML_MODEL/fault_prediction_model.json: not found".into()),
            identity_scaler(8),
        );

        let err = Predictor::new(Arc::new(bundle)).predict(&record()).unwrap_err();
        assert_eq!(
            err,
            PipelineError::ArtifactUnavailable(
                "Failed to load model from ML_MODEL/fault_prediction_model.json: not found".into()
            )
        );
    }

    #[test]
    fn test_missing_scaler_fails() {
        let clf: Arc<dyn Classifier> = Arc::new(RecordingClassifier::new(0, None));
        let err = predictor(clf, Artifact::Missing).predict(&record()).unwrap_err();
        assert_eq!(err, PipelineError::ArtifactUnavailable("Scaler is not loaded.".into()));
    }

    #[test]
    fn test_classifier_failure_is_inference_error() {
        let err = predictor(Arc::new(BrokenClassifier), identity_scaler(8))
            .predict(&record())
            .unwrap_err();

        assert!(matches!(err, PipelineError::Inference(_)));
        assert_eq!(err.to_string(), "Inference error: internal numeric error");
    }

    #[test]
    fn test_concurrent_predictions_share_bundle() {
        let clf = Arc::new(RecordingClassifier::new(1, Some(vec![0.1, 0.9])));
        let predictor = predictor(clf.clone(), identity_scaler(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let predictor = predictor.clone();
                std::thread::spawn(move || predictor.predict(&record()).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().label, FaultLabel::Faulty);
        }
        assert_eq!(clf.seen.lock().unwrap().len(), 8);
    }
}
