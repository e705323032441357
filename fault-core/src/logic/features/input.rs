//! Input Record - raw telemetry as it arrives from a client
//!
//! Field names follow the public API (`RSSI`, `SINR`, ...), not the canonical
//! training column names. Renaming happens in the mapper.

use serde::{Deserialize, Serialize};

/// One telemetry sample from a 5G cell.
///
/// The six link-quality fields are always present. Every other field is
/// present-or-absent: an absent field contributes no feature at all, it is
/// never defaulted here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "RSSI")]
    pub rssi: f64,
    #[serde(rename = "SINR")]
    pub sinr: f64,
    pub throughput: f64,
    pub latency: f64,
    pub jitter: f64,
    pub packet_loss: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_users: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_peak_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_quality_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_stress: Option<f64>,
}

impl InputRecord {
    /// Record with only the required link-quality fields populated
    pub fn new(
        rssi: f64,
        sinr: f64,
        throughput: f64,
        latency: f64,
        jitter: f64,
        packet_loss: f64,
    ) -> Self {
        Self {
            rssi,
            sinr,
            throughput,
            latency,
            jitter,
            packet_loss,
            ..Default::default()
        }
    }

    /// Required values in the same order as `layout::REQUIRED_FEATURES`
    pub fn required_values(&self) -> [f64; 6] {
        [
            self.rssi,
            self.sinr,
            self.throughput,
            self.latency,
            self.jitter,
            self.packet_loss,
        ]
    }

    /// Optional values in the same order as `layout::OPTIONAL_FEATURES`
    pub fn optional_values(&self) -> [Option<f64>; 9] {
        [
            self.cpu_usage_percent,
            self.memory_usage_percent,
            self.active_users,
            self.temperature_celsius,
            self.hour,
            self.day_of_week,
            self.is_peak_hour,
            self.network_quality_score,
            self.resource_stress,
        ]
    }
}
