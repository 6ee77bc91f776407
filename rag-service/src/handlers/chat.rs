use crate::dtos::{ChatRequest, ChatResponse};
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

/// `POST /api/chat`: persona chat relayed to the model without retrieval.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| super::invalid_body("message", e))?;
    request.validate()?;

    let reply = state
        .pipeline
        .chat(&request.message)
        .await
        .map_err(|e| AppError::UpstreamError(anyhow::Error::new(e)))?;

    Ok(Json(ChatResponse { reply }))
}
