use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::recommender::{self, Recommendation};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<Recommendation>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "dimension": state.store.dimension(),
            "users": state.store.user_count(),
        })),
    )
}

/// Recommends content for the given list of already-viewed content indices.
pub async fn predict(
    State(state): State<AppState>,
    Json(viewed): Json<Vec<i64>>,
) -> AppResult<Json<PredictResponse>> {
    let viewed = validate_indices(&viewed, state.store.dimension())?;
    let predictions =
        recommender::recommend(state.model.as_ref(), &state.store, &viewed, state.top_n)?;
    Ok(Json(PredictResponse { predictions }))
}

/// Rejects negative and out-of-range indices before they reach the
/// vectorizer, so clients get a 400 instead of an internal fault.
fn validate_indices(raw: &[i64], dim: usize) -> AppResult<Vec<usize>> {
    raw.iter()
        .map(|&idx| {
            usize::try_from(idx)
                .ok()
                .filter(|&i| i < dim)
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "content index {} out of range (known content indices are 0..{})",
                        idx, dim
                    ))
                })
        })
        .collect()
}
