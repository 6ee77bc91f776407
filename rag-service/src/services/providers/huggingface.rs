//! Hugging Face Inference API provider.
//!
//! Implements text generation against `POST {api_base}/models/{model_id}`.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use service_core::observability::TracedClientExt;

/// Hugging Face provider configuration.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_token: Option<String>,
    pub api_base: String,
    pub model: String,
}

/// Hugging Face text generation provider.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Build the inference URL for the configured model.
    fn api_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn api_token(&self) -> Result<&str, ProviderError> {
        self.config
            .api_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured("Hugging Face access token not configured".to_string())
            })
    }
}

#[async_trait]
impl TextProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        inputs: &str,
        params: &GenerationParams,
    ) -> Result<serde_json::Value, ProviderError> {
        let token = self.api_token()?;

        let request = TextGenerationRequest {
            inputs,
            parameters: TextGenerationParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            inputs_len = inputs.len(),
            "Sending request to Hugging Face Inference API"
        );

        let response = self
            .client
            .traced_post(&self.api_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Hugging Face API error {}: {}",
                status,
                api_error_message(&error_text)
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.api_token().map(|_| ())
    }
}

/// Pull the `error` field out of a Hugging Face error body, if there is one.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// ============================================================================
// Hugging Face API Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}
