use crate::dtos::{SuggestRequest, SuggestResponse};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

/// `POST /api/suggest`: proposed solution for an environmental problem.
pub async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, AppError> {
    let Json(request) = payload.map_err(|e| super::invalid_body("problem_text", e))?;
    request.validate()?;

    let solution = state
        .pipeline
        .suggest(&request.problem_text)
        .await
        .map_err(|e| AppError::UpstreamError(anyhow::Error::new(e)))?;

    Ok(Json(SuggestResponse { solution }))
}
