//! Text generation backends.
//!
//! A provider sends one prompt to a hosted model and hands back the raw JSON
//! reply. Turning that reply into text is the gateway's job, because the
//! shape differs between providers and API versions.

pub mod huggingface;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

/// Decoding parameters for a generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    /// Maximum number of generated tokens.
    pub max_new_tokens: Option<u32>,

    /// Sampling temperature. Low values lean deterministic.
    pub temperature: Option<f32>,

    /// Top-p sampling.
    pub top_p: Option<f32>,
}

/// Trait for text generation providers (e.g., Hugging Face Inference API).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name, used in logs and metrics.
    fn name(&self) -> &str;

    /// Model identifier the provider targets.
    fn model(&self) -> &str;

    /// Generate text for the given inputs and return the raw backend reply.
    async fn generate(
        &self,
        inputs: &str,
        params: &GenerationParams,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Cheap readiness check. Does not call the backend.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
