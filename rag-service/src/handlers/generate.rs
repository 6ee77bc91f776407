use crate::dtos::{GenerateRequest, GenerateResponse};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

/// `POST /api/generate`: answer a prompt grounded in the corpus.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(request) = payload.map_err(|e| super::invalid_body("prompt", e))?;
    request.validate()?;

    let response = state
        .pipeline
        .generate_from_prompt(&request.prompt)
        .await
        .map_err(|e| AppError::UpstreamError(anyhow::Error::new(e)))?;

    Ok(Json(GenerateResponse { response }))
}
