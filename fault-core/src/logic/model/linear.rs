//! Linear Classifiers - logistic regression and linear SVM exports
//!
//! Both share one parameter layout: `score = coef · x + intercept`, class
//! `classes[1]` when the score is positive. Only logistic regression turns the
//! score into probabilities.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::classifier::{check_classes, check_width, sigmoid, Classifier, ClassifierCapabilities};
use super::inference::InferenceError;

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// Serialized parameters of a fitted binary linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LinearModel {
    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("coef is empty".to_string());
        }
        if self.classes.len() != 2 {
            return Err(format!("expected 2 classes, found {}", self.classes.len()));
        }
        check_classes(&self.classes)?;
        if let Some(names) = &self.feature_names {
            if names.len() != self.coef.len() {
                return Err(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coef.len()
                ));
            }
        }
        Ok(())
    }

    fn score(&self, features: &[f64], what: &str) -> Result<f64, InferenceError> {
        check_width(features.len(), self.coef.len(), what)?;
        let score = ArrayView1::from(features).dot(&ArrayView1::from(&self.coef[..])) + self.intercept;
        Ok(score)
    }
}

/// Which estimator produced the parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearKind {
    LogisticRegression,
    LinearSvc,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    kind: LinearKind,
    model: LinearModel,
}

impl LinearClassifier {
    pub fn new(kind: LinearKind, model: LinearModel) -> Result<Self, String> {
        model.validate()?;
        Ok(Self { kind, model })
    }
}

impl Classifier for LinearClassifier {
    fn kind(&self) -> &'static str {
        match self.kind {
            LinearKind::LogisticRegression => "LogisticRegression",
            LinearKind::LinearSvc => "LinearSVC",
        }
    }

    fn capabilities(&self) -> ClassifierCapabilities {
        ClassifierCapabilities {
            probability: self.kind == LinearKind::LogisticRegression,
            decision_score: true,
            feature_names: self.model.feature_names.is_some(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let score = self.model.score(features, self.kind())?;
        let index = if score > 0.0 { 1 } else { 0 };
        Ok(self.model.classes[index])
    }

    fn predict_probability(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if self.kind != LinearKind::LogisticRegression {
            return Err(InferenceError::unsupported(self.kind(), "predict_probability"));
        }
        let p = sigmoid(self.model.score(features, self.kind())?);
        Ok(vec![1.0 - p, p])
    }

    fn decision_score(&self, features: &[f64]) -> Result<f64, InferenceError> {
        self.model.score(features, self.kind())
    }

    fn declared_feature_names(&self) -> Option<Vec<String>> {
        self.model.feature_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel {
            coef: vec![1.0, -2.0],
            intercept: 0.5,
            classes: vec![0, 1],
            feature_names: None,
        }
    }

    #[test]
    fn test_logistic_regression() {
        let clf = LinearClassifier::new(LinearKind::LogisticRegression, model()).unwrap();

        // 3 - 2 + 0.5 = 1.5
        assert_eq!(clf.decision_score(&[3.0, 1.0]).unwrap(), 1.5);
        assert_eq!(clf.predict(&[3.0, 1.0]).unwrap(), 1);
        assert_eq!(clf.predict(&[0.0, 1.0]).unwrap(), 0);

        let proba = clf.predict_probability(&[3.0, 1.0]).unwrap();
        assert!((proba[1] - sigmoid(1.5)).abs() < 1e-12);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_svc_has_no_probability() {
        let clf = LinearClassifier::new(LinearKind::LinearSvc, model()).unwrap();

        assert!(!clf.capabilities().probability);
        assert!(clf.capabilities().decision_score);
        assert!(clf.predict_probability(&[3.0, 1.0]).is_err());
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let clf = LinearClassifier::new(LinearKind::LogisticRegression, model()).unwrap();
        assert!(clf.predict(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_validate() {
        let mut bad = model();
        bad.classes = vec![0, 1, 2];
        assert!(LinearClassifier::new(LinearKind::LinearSvc, bad).is_err());

        let mut shifted = model();
        shifted.classes = vec![1, 2];
        assert!(shifted.validate().is_err());

        let mut named = model();
        named.feature_names = Some(vec!["a".into()]);
        assert!(named.validate().is_err());
    }
}
