use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "message": "Aurora v7 - generative RAG API"
    }))
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "rag-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: unready while the backend has no credential.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if let Err(e) = state.pipeline.gateway().health_check().await {
        tracing::warn!(error = %e, "Readiness check failed");
        return Err(AppError::ServiceUnavailable);
    }

    Ok(Json(json!({
        "status": "ready",
        "corpus_loaded": state.pipeline.corpus().is_loaded()
    })))
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        get_metrics(),
    )
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Route not found"))
}
