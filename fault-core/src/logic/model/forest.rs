//! Random Forest - tree ensemble export
//!
//! Each tree is a flat node array. Internal nodes send a row left when
//! `x[feature] <= threshold`. Leaves carry per-class weights (counts or
//! fractions); the forest probability is the mean of the normalised leaves.

use serde::{Deserialize, Serialize};

use super::classifier::{check_classes, check_width, Classifier, ClassifierCapabilities};
use super::inference::InferenceError;

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f64,
    /// Child indices; both `None` on a leaf
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    /// Per-class weights, only read on leaves
    #[serde(default)]
    pub value: Vec<f64>,
}

impl TreeNode {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.value.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        i,
                        node.value.len(),
                        n_classes
                    ));
                }
                continue;
            }
            let (Some(left), Some(right)) = (node.left, node.right) else {
                return Err(format!("node {} has only one child", i));
            };
            // Children always follow their parent, so traversal terminates
            if left <= i || right <= i || left >= self.nodes.len() || right >= self.nodes.len() {
                return Err(format!("node {} has invalid children ({}, {})", i, left, right));
            }
            if node.feature >= n_features {
                return Err(format!("node {} splits on feature {} of {}", i, node.feature, n_features));
            }
        }
        Ok(())
    }

    /// Normalised class distribution of the leaf `features` lands in
    fn leaf_distribution(&self, features: &[f64]) -> Vec<f64> {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    index = if features[node.feature] <= node.threshold { left } else { right };
                }
                _ => {
                    let total: f64 = node.value.iter().sum();
                    if total > 0.0 {
                        return node.value.iter().map(|v| v / total).collect();
                    }
                    return vec![1.0 / node.value.len() as f64; node.value.len()];
                }
            }
        }
    }
}

/// Serialized fitted forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl RandomForest {
    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if self.classes.len() < 2 {
            return Err(format!("expected at least 2 classes, found {}", self.classes.len()));
        }
        check_classes(&self.classes)?;
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(format!("{} feature names for {} features", names.len(), self.n_features));
            }
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ForestClassifier {
    forest: RandomForest,
}

impl ForestClassifier {
    pub fn new(forest: RandomForest) -> Result<Self, String> {
        forest.validate()?;
        Ok(Self { forest })
    }
}

impl Classifier for ForestClassifier {
    fn kind(&self) -> &'static str {
        "RandomForestClassifier"
    }

    fn capabilities(&self) -> ClassifierCapabilities {
        ClassifierCapabilities {
            probability: true,
            decision_score: false,
            feature_names: self.forest.feature_names.is_some(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        self.predict_with_probability(features).map(|(label, _)| label)
    }

    fn predict_with_probability(&self, features: &[f64]) -> Result<(i64, Vec<f64>), InferenceError> {
        let proba = self.predict_probability(features)?;
        let best = proba
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > proba[best] { i } else { best });
        Ok((self.forest.classes[best], proba))
    }

    fn predict_probability(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        check_width(features.len(), self.forest.n_features, self.kind())?;

        let n_classes = self.forest.classes.len();
        let mut proba = vec![0.0; n_classes];
        for tree in &self.forest.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(features)) {
                *acc += p;
            }
        }

        let n_trees = self.forest.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    fn declared_feature_names(&self) -> Option<Vec<String>> {
        self.forest.feature_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: [f64; 2]) -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: None,
            right: None,
            value: value.to_vec(),
        }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature,
            threshold,
            left: Some(left),
            right: Some(right),
            value: Vec::new(),
        }
    }

    /// Stump on feature 0 (latency): <= 50 mostly normal, above mostly faulty
    fn forest() -> RandomForest {
        RandomForest {
            n_features: 2,
            classes: vec![0, 1],
            trees: vec![
                DecisionTree {
                    nodes: vec![split(0, 50.0, 1, 2), leaf([9.0, 1.0]), leaf([2.0, 8.0])],
                },
                DecisionTree {
                    nodes: vec![split(1, 5.0, 1, 2), leaf([0.7, 0.3]), leaf([0.1, 0.9])],
                },
            ],
            feature_names: Some(vec!["latency_ms".into(), "packet_loss_percent".into()]),
        }
    }

    #[test]
    fn test_probability_is_mean_of_leaves() {
        let clf = ForestClassifier::new(forest()).unwrap();

        let proba = clf.predict_probability(&[80.0, 1.0]).unwrap();
        // (0.8 + 0.3) / 2
        assert!((proba[1] - 0.55).abs() < 1e-12);
        assert_eq!(clf.predict(&[80.0, 1.0]).unwrap(), 1);

        let proba = clf.predict_probability(&[10.0, 1.0]).unwrap();
        assert!((proba[1] - 0.2).abs() < 1e-12);
        assert_eq!(clf.predict(&[10.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn test_capabilities() {
        let clf = ForestClassifier::new(forest()).unwrap();
        let caps = clf.capabilities();

        assert!(caps.probability);
        assert!(!caps.decision_score);
        assert!(caps.feature_names);
        assert!(clf.decision_score(&[1.0, 1.0]).is_err());
        assert_eq!(clf.declared_feature_names().unwrap().len(), 2);
    }

    #[test]
    fn test_validate_rejects_backward_children() {
        let mut bad = forest();
        bad.trees[0].nodes[0] = split(0, 50.0, 0, 2);
        assert!(ForestClassifier::new(bad).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let mut bad = forest();
        bad.trees[1].nodes[0] = split(7, 5.0, 1, 2);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unencoded_classes() {
        let mut bad = forest();
        bad.classes = vec![1, 0];
        let err = ForestClassifier::new(bad).unwrap_err();
        assert!(err.contains("label-encoded"), "{}", err);
    }

    #[test]
    fn test_label_and_probability_agree() {
        let clf = ForestClassifier::new(forest()).unwrap();
        let (label, proba) = clf.predict_with_probability(&[80.0, 1.0]).unwrap();
        assert_eq!(label, 1);
        assert!((proba[1] - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let clf = ForestClassifier::new(forest()).unwrap();
        assert!(clf.predict(&[1.0]).is_err());
    }
}
