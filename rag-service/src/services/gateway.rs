//! Generation gateway.
//!
//! Wraps a [`TextProvider`] with fixed decoding parameters and an optional
//! deadline, and turns whatever JSON the backend returns into plain text.

use crate::services::metrics;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// The single failure type callers of the pipeline see.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to generate a response from the AI model: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to generate a response from the AI model: no reply within {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

type Extractor = fn(&Value) -> Option<String>;

/// Tried in order; the first strategy to yield text wins.
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("generated_text", direct_generated_text),
    ("first_result", first_result_generated_text),
];

/// `{"generated_text": "..."}`
fn direct_generated_text(value: &Value) -> Option<String> {
    non_empty_text(value.get("generated_text")?)
}

/// `[{"generated_text": "..."}, ...]`
fn first_result_generated_text(value: &Value) -> Option<String> {
    non_empty_text(value.as_array()?.first()?.get("generated_text")?)
}

fn non_empty_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Turn a backend reply into text. Falls back to the serialized reply so the
/// caller always gets something readable when the response shape drifts.
pub fn normalize_response(value: &Value) -> String {
    let extracted = EXTRACTORS
        .iter()
        .find_map(|(name, extract)| extract(value).map(|text| (*name, text)));

    match extracted {
        Some((strategy, text)) => {
            metrics::record_response_shape(strategy);
            text
        }
        None => {
            tracing::warn!("Unrecognized backend response shape, returning raw JSON");
            metrics::record_response_shape("raw");
            value.to_string()
        }
    }
}

/// Sends composite prompts to the configured backend.
#[derive(Clone)]
pub struct GenerationGateway {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
    timeout: Option<Duration>,
}

impl GenerationGateway {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams) -> Self {
        Self {
            provider,
            params,
            timeout: None,
        }
    }

    /// Treat a backend that has not answered within `timeout` as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate text for the prompt. No retries.
    pub async fn infer(&self, prompt: &str) -> Result<String, GenerationError> {
        let provider = self.provider.name();
        let model = self.provider.model();
        let start = Instant::now();

        let call = self.provider.generate(prompt, &self.params);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(GenerationError::from),
                Err(_) => Err(GenerationError::Timeout(limit)),
            },
            None => call.await.map_err(GenerationError::from),
        };

        metrics::record_provider_latency(provider, model, start.elapsed().as_secs_f64());

        match result {
            Ok(raw) => Ok(normalize_response(&raw)),
            Err(e) => {
                let error_type = match &e {
                    GenerationError::Provider(inner) => inner.kind(),
                    GenerationError::Timeout(_) => "timeout",
                };
                metrics::record_provider_error(provider, error_type);
                tracing::error!(provider, model, error = %e, "Generation backend call failed");
                Err(e)
            }
        }
    }

    /// Whether the provider is able to serve requests.
    pub async fn health_check(&self) -> Result<(), ProviderError> {
        self.provider.health_check().await
    }
}
