//! HTTP handlers for the RAG service.

pub mod chat;
pub mod generate;
pub mod health;
pub mod suggest;

pub use chat::chat;
pub use generate::generate;
pub use health::{health_check, metrics, not_found, readiness_check, root};
pub use suggest::suggest;

use axum::extract::rejection::JsonRejection;
use service_core::error::AppError;

/// Map a body that is not JSON, or lacks the required string field, to a 400.
pub(crate) fn invalid_body(field: &str, rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    AppError::BadRequest(anyhow::anyhow!(
        "Field '{}' is required and must be a string",
        field
    ))
}
