//! Feature Mapper - InputRecord -> named feature values
//!
//! Builds the vector in three passes:
//! 1. required fields under their canonical names
//! 2. present optional fields under their own names
//! 3. engineered features, best-effort
//!
//! An engineered feature that cannot be computed is skipped, never raised.
//! Schema alignment zero-fills whatever is missing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::input::InputRecord;
use super::layout::{OPTIONAL_FEATURES, REQUIRED_FEATURES};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Canonical feature name -> value.
///
/// Backed by a `BTreeMap`, so iteration is always in lexicographic name order.
/// That order is the fallback column order when no schema is known.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// (name, value) pairs in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============================================================================
// ENGINEERED FEATURES
// ============================================================================

/// Why an engineered feature was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An operand is not in the vector
    MissingOperand(&'static str),
    /// The arithmetic produced NaN or an infinity
    NonFinite,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingOperand(name) => write!(f, "missing operand '{}'", name),
            SkipReason::NonFinite => write!(f, "non-finite result"),
        }
    }
}

/// Derived features mirroring the offline training transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineeredFeature {
    /// throughput_mbps / (latency_ms + 1)
    EfficiencyScore,
    /// sinr_db / (|rssi_dbm| + 1)
    SignalRatio,
    /// active_users / (cpu_usage_percent + 1)
    NetworkLoadFactor,
}

impl EngineeredFeature {
    pub const ALL: [EngineeredFeature; 3] = [
        EngineeredFeature::EfficiencyScore,
        EngineeredFeature::SignalRatio,
        EngineeredFeature::NetworkLoadFactor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EngineeredFeature::EfficiencyScore => "efficiency_score",
            EngineeredFeature::SignalRatio => "signal_ratio",
            EngineeredFeature::NetworkLoadFactor => "network_load_factor",
        }
    }

    /// Compute from the features collected so far
    pub fn compute(&self, features: &FeatureVector) -> Result<f64, SkipReason> {
        let operand = |name: &'static str| {
            features.get(name).ok_or(SkipReason::MissingOperand(name))
        };

        let value = match self {
            EngineeredFeature::EfficiencyScore => {
                operand("throughput_mbps")? / (operand("latency_ms")? + 1.0)
            }
            EngineeredFeature::SignalRatio => {
                operand("sinr_db")? / (operand("rssi_dbm")?.abs() + 1.0)
            }
            EngineeredFeature::NetworkLoadFactor => {
                operand("active_users")? / (operand("cpu_usage_percent")? + 1.0)
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(SkipReason::NonFinite)
        }
    }
}

// ============================================================================
// MAPPER
// ============================================================================

/// Stateless mapper from request records to named features
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureMapper;

impl FeatureMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, record: &InputRecord) -> FeatureVector {
        let mut features = FeatureVector::new();

        for ((_, canonical), value) in REQUIRED_FEATURES.iter().zip(record.required_values()) {
            features.insert(*canonical, value);
        }

        for (name, value) in OPTIONAL_FEATURES.iter().zip(record.optional_values()) {
            if let Some(value) = value {
                features.insert(*name, value);
            }
        }

        for feature in EngineeredFeature::ALL {
            if features.contains(feature.name()) {
                continue;
            }
            match feature.compute(&features) {
                Ok(value) => features.insert(feature.name(), value),
                Err(reason) => {
                    log::debug!("Skipping engineered feature {}: {}", feature.name(), reason);
                }
            }
        }

        features
    }
}
