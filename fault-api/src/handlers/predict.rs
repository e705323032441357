//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use fault_core::{InputRecord, PredictionResponse};
use validator::Validate;

use crate::models::PredictRequest;
use crate::{AppResult, AppState};

/// Classify one telemetry sample as Normal or Faulty
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let record = InputRecord::from(req);
    let result = state.predictor.predict(&record)?;

    tracing::info!(
        "Prediction: {} (confidence: {:?}%)",
        result.label,
        result.confidence_percent
    );

    Ok(Json(PredictionResponse::from(&result)))
}
