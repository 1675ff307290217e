//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use feature_engine::CustomerRecord;
use inference_engine::ChurnPrediction;
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Score one customer record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CustomerRecord>, JsonRejection>,
) -> Result<Json<ChurnPrediction>, ApiError> {
    let Json(record) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let result = state.score(&record)?;
    Ok(Json(result.prediction))
}
