//! Response Composer - PredictionResult -> wire payload

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIDENCE_DECIMALS, PROBABILITY_DECIMALS};

use super::inference::PredictionResult;
use super::label::FaultLabel;

/// `{prediction, probability_faulty?, confidence_percent?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: FaultLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_faulty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_percent: Option<f64>,
}

/// Round the exact binary value to `decimals` places, ties to even
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        // Both fields come from the same probability; emit both or neither
        let (probability_faulty, confidence_percent) =
            match (result.probability_faulty, result.confidence_percent) {
                (Some(p), Some(c)) => (
                    Some(round_to(p, PROBABILITY_DECIMALS)),
                    Some(round_to(c, CONFIDENCE_DECIMALS)),
                ),
                _ => (None, None),
            };

        Self {
            prediction: result.label,
            probability_faulty,
            confidence_percent,
        }
    }
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self::from(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_only() {
        let response = PredictionResponse::from(PredictionResult::new(FaultLabel::Normal, None));
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"prediction": "Normal"}));
    }

    #[test]
    fn test_rounding() {
        let response = PredictionResponse::from(PredictionResult::new(FaultLabel::Faulty, Some(0.123456789)));

        assert_eq!(response.probability_faulty, Some(0.123457));
        assert_eq!(response.confidence_percent, Some(12.35));
    }

    #[test]
    fn test_float_noise_rounded_away() {
        // 0.8 * 100 is 80.00000000000001 in binary floating point
        let response = PredictionResponse::from(PredictionResult::new(FaultLabel::Faulty, Some(0.8)));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"prediction": "Faulty", "probability_faulty": 0.8, "confidence_percent": 80.0})
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(-0.125_01, 2), -0.13);
        assert_eq!(round_to(42.0, 6), 42.0);
    }

    #[test]
    fn test_round_to_uses_exact_value() {
        // 0.0012345 is stored just below the midpoint
        assert_eq!(round_to(0.0012345, 6), 0.001234);
        // 50.125 is exact: tie goes to even
        assert_eq!(round_to(50.125, 2), 50.12);
        assert_eq!(round_to(0.5012345, 6), 0.501235);
    }

    #[test]
    fn test_composed_payload_rounding() {
        let response = PredictionResponse::from(PredictionResult::new(FaultLabel::Faulty, Some(0.0012345)));
        assert_eq!(response.probability_faulty, Some(0.001234));

        // 0.50125 * 100 lands exactly on 50.125
        let response = PredictionResponse::from(PredictionResult::new(FaultLabel::Faulty, Some(0.50125)));
        assert_eq!(response.confidence_percent, Some(50.12));
    }
}
