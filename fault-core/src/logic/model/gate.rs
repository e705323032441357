//! Scaling Gate - only scale when the scaler was fit on the same width
//!
//! A mismatched scaler either crashes on dimension checks or, worse, silently
//! scales the wrong columns. Unscaled inference is preferred over both.

use std::fmt;

use crate::logic::features::ExpectedSchema;

use super::classifier::Scaler;

/// Why the scaler was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    NoScaler,
    NoSchema,
    UnknownFeatureCount,
    CountMismatch { scaler: usize, expected: usize },
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BypassReason::NoScaler => write!(f, "no scaler loaded"),
            BypassReason::NoSchema => write!(f, "no expected schema to compare against"),
            BypassReason::UnknownFeatureCount => write!(f, "scaler does not report a feature count"),
            BypassReason::CountMismatch { scaler, expected } => write!(
                f,
                "scaler fit on {} features, schema has {}",
                scaler, expected
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingDecision {
    Apply,
    Bypass(BypassReason),
}

impl ScalingDecision {
    pub fn should_apply(&self) -> bool {
        matches!(self, ScalingDecision::Apply)
    }
}

/// Apply iff a scaler is present, reports a count, and the count equals the
/// schema length. No schema (or an empty one) never applies.
pub fn evaluate(scaler: Option<&dyn Scaler>, schema: Option<&ExpectedSchema>) -> ScalingDecision {
    let Some(scaler) = scaler else {
        return ScalingDecision::Bypass(BypassReason::NoScaler);
    };
    let Some(schema) = schema.filter(|s| !s.is_empty()) else {
        return ScalingDecision::Bypass(BypassReason::NoSchema);
    };
    let Some(count) = scaler.expected_feature_count() else {
        return ScalingDecision::Bypass(BypassReason::UnknownFeatureCount);
    };

    if count == schema.len() {
        ScalingDecision::Apply
    } else {
        ScalingDecision::Bypass(BypassReason::CountMismatch {
            scaler: count,
            expected: schema.len(),
        })
    }
}
