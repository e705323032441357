//! Feature Layout - Canonical feature names
//!
//! **This file controls the naming contract with the offline training data.**
//!
//! Public request fields are renamed to the column names the model was trained
//! on. Engineered features mirror transformations applied during training.
//! The column ORDER is not fixed here: it comes from the loaded artifacts
//! (see `schema.rs`).

use crc32fast::Hasher;

// ============================================================================
// CANONICAL NAMES
// ============================================================================

/// Required request field -> canonical training column.
/// Total: every required field has exactly one target.
pub const REQUIRED_FEATURES: [(&str, &str); 6] = [
    ("RSSI", "rssi_dbm"),
    ("SINR", "sinr_db"),
    ("throughput", "throughput_mbps"),
    ("latency", "latency_ms"),
    ("jitter", "jitter_ms"),
    ("packet_loss", "packet_loss_percent"),
];

/// Optional fields, passed through under their own name
pub const OPTIONAL_FEATURES: [&str; 9] = [
    "cpu_usage_percent",
    "memory_usage_percent",
    "active_users",
    "temperature_celsius",
    "hour",
    "day_of_week",
    "is_peak_hour",
    "network_quality_score",
    "resource_stress",
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of an ordered column list.
/// Two artifacts with the same hash expect the same columns in the same order.
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::mapper::EngineeredFeature;

    #[test]
    fn test_canonical_names_do_not_collide() {
        for (_, canonical) in REQUIRED_FEATURES {
            assert!(!OPTIONAL_FEATURES.contains(&canonical));
        }
        for feature in EngineeredFeature::ALL {
            assert!(REQUIRED_FEATURES.iter().all(|(_, c)| *c != feature.name()));
            assert!(!OPTIONAL_FEATURES.contains(&feature.name()));
        }
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = compute_layout_hash(&["rssi_dbm", "sinr_db"]);
        let b = compute_layout_hash(&["sinr_db", "rssi_dbm"]);
        assert_ne!(a, b);
        assert_eq!(a, compute_layout_hash(&["rssi_dbm", "sinr_db"]));
    }

    #[test]
    fn test_layout_hash_separates_names() {
        // "ab" + "c" must not hash like "a" + "bc"
        assert_ne!(
            compute_layout_hash(&["ab", "c"]),
            compute_layout_hash(&["a", "bc"])
        );
    }
}
