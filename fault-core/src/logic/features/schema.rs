//! Schema Reconciler - align named features to the model's column order
//!
//! The model was fit on a specific ordered column set. At inference time that
//! order must be reproduced exactly, including zero-filling any column the
//! mapper could not produce.

use serde::{Deserialize, Serialize};

use super::layout::compute_layout_hash;
use super::mapper::FeatureVector;

/// Value substituted for an expected column the mapper did not produce
pub const MISSING_FEATURE_VALUE: f64 = 0.0;

// ============================================================================
// EXPECTED SCHEMA
// ============================================================================

/// Ordered column names the classifier/scaler were fit on.
/// When present it is authoritative for both column set and column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedSchema(Vec<String>);

impl ExpectedSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn layout_hash(&self) -> u32 {
        compute_layout_hash(&self.0)
    }

    /// First available source wins, in the order given.
    /// Empty lists count as "not found".
    pub fn resolve<I>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<ExpectedSchema>>,
    {
        candidates
            .into_iter()
            .flatten()
            .find(|schema| !schema.is_empty())
    }
}

// ============================================================================
// ALIGNED VECTOR
// ============================================================================

/// Fixed-length ordered values, ready for the scaler/classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedVector {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl AlignedVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Align `features` to `schema`.
///
/// - schema present and non-empty: schema order, missing columns zero-filled,
///   columns not in the schema dropped
/// - otherwise: every feature, sorted by name, unchanged
pub fn reconcile(features: &FeatureVector, schema: Option<&ExpectedSchema>) -> AlignedVector {
    match schema.filter(|s| !s.is_empty()) {
        Some(schema) => {
            let values = schema
                .names()
                .iter()
                .map(|name| match features.get(name) {
                    Some(value) => value,
                    None => {
                        log::debug!("Expected feature '{}' not computed, filling {}", name, MISSING_FEATURE_VALUE);
                        MISSING_FEATURE_VALUE
                    }
                })
                .collect();

            AlignedVector {
                names: schema.names().to_vec(),
                values,
            }
        }
        None => {
            let (names, values) = features
                .iter()
                .map(|(name, value)| (name.to_string(), value))
                .unzip();

            AlignedVector { names, values }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order_and_zero_fill() {
        let features: FeatureVector = [("a", 5.0)].into_iter().collect();
        let schema = ExpectedSchema::new(["a", "b", "c"]);

        let aligned = reconcile(&features, Some(&schema));

        assert_eq!(aligned.values, vec![5.0, 0.0, 0.0]);
        assert_eq!(aligned.names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extra_features_dropped() {
        let features: FeatureVector = [("z", 1.0), ("b", 2.0), ("x", 3.0)].into_iter().collect();
        let schema = ExpectedSchema::new(["b", "a"]);

        let aligned = reconcile(&features, Some(&schema));

        assert_eq!(aligned.values, vec![2.0, 0.0]);
    }

    #[test]
    fn test_length_matches_schema() {
        let features: FeatureVector = (0..20).map(|i| (format!("f{:02}", i), i as f64)).collect();

        for n in [0usize, 1, 5, 20, 40] {
            let schema = ExpectedSchema::new((0..n).map(|i| format!("f{:02}", i * 2)));
            let aligned = reconcile(&features, Some(&schema));
            let expected = if n == 0 { features.len() } else { n };
            assert_eq!(aligned.len(), expected);
        }
    }

    #[test]
    fn test_absent_schema_sorts_names() {
        let features: FeatureVector = [("sinr_db", 18.0), ("latency_ms", 15.0), ("rssi_dbm", -75.0)]
            .into_iter()
            .collect();

        let aligned = reconcile(&features, None);

        assert_eq!(aligned.names, vec!["latency_ms", "rssi_dbm", "sinr_db"]);
        assert_eq!(aligned.values, vec![15.0, -75.0, 18.0]);
    }

    #[test]
    fn test_empty_schema_behaves_like_absent() {
        let features: FeatureVector = [("b", 1.0), ("a", 2.0)].into_iter().collect();
        let empty = ExpectedSchema::new(Vec::<String>::new());

        assert_eq!(reconcile(&features, Some(&empty)), reconcile(&features, None));
    }

    #[test]
    fn test_resolve_priority() {
        let declared = Some(ExpectedSchema::new(["m1", "m2"]));
        let sidecar = Some(ExpectedSchema::new(["s1"]));

        assert_eq!(
            ExpectedSchema::resolve([declared.clone(), sidecar.clone()]),
            declared
        );
        assert_eq!(ExpectedSchema::resolve([None, sidecar.clone()]), sidecar);
        assert_eq!(
            ExpectedSchema::resolve([Some(ExpectedSchema::new(Vec::<String>::new())), sidecar.clone()]),
            sidecar
        );
        assert_eq!(ExpectedSchema::resolve([None, None]), None);
    }
}
