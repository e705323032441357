//! Prediction request model

use fault_core::InputRecord;
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /predict`.
///
/// Field names are the public API names. Any numeric value is accepted;
/// a missing or non-numeric required field is rejected during extraction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[serde(rename = "RSSI")]
    pub rssi: f64,
    #[serde(rename = "SINR")]
    pub sinr: f64,
    pub throughput: f64,
    pub latency: f64,
    pub jitter: f64,
    pub packet_loss: f64,

    // Optional fields used by the trained model (if present)
    pub cpu_usage_percent: Option<f64>,
    pub memory_usage_percent: Option<f64>,
    pub active_users: Option<f64>,
    pub temperature_celsius: Option<f64>,
    pub hour: Option<f64>,
    pub day_of_week: Option<f64>,
    pub is_peak_hour: Option<f64>,
    pub network_quality_score: Option<f64>,
    pub resource_stress: Option<f64>,
}

impl From<PredictRequest> for InputRecord {
    fn from(req: PredictRequest) -> Self {
        InputRecord {
            rssi: req.rssi,
            sinr: req.sinr,
            throughput: req.throughput,
            latency: req.latency,
            jitter: req.jitter,
            packet_loss: req.packet_loss,
            cpu_usage_percent: req.cpu_usage_percent,
            memory_usage_percent: req.memory_usage_percent,
            active_users: req.active_users,
            temperature_celsius: req.temperature_celsius,
            hour: req.hour,
            day_of_week: req.day_of_week,
            is_peak_hour: req.is_peak_hour,
            network_quality_score: req.network_quality_score,
            resource_stress: req.resource_stress,
        }
    }
}
