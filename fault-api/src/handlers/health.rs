//! Health check handler

use axum::{extract::State, Json};
use fault_core::HealthReport;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    report: HealthReport,
    version: &'static str,
    environment: String,
    timestamp: i64,
    artifacts_loaded_at: i64,
}

/// Artifact load status; served on `/` and `/health`
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let bundle = state.predictor.bundle();

    Json(HealthResponse {
        report: HealthReport::from_bundle(bundle),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
        artifacts_loaded_at: bundle.loaded_at().timestamp(),
    })
}
