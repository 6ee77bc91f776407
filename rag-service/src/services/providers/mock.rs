//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Behavior {
    /// Reply `[{"generated_text": "Mock response for: <inputs>"}]`.
    Echo,
    /// Reply with a fixed JSON value.
    Fixed(serde_json::Value),
    /// Fail with a network error carrying this message.
    Fail(String),
    /// Behave like a provider without credentials.
    Disabled,
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    behavior: Behavior,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_inputs: Mutex<Option<String>>,
}

impl MockTextProvider {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            last_inputs: Mutex::new(None),
        }
    }

    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    pub fn with_response(response: serde_json::Value) -> Self {
        Self::with_behavior(Behavior::Fixed(response))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    pub fn disabled() -> Self {
        Self::with_behavior(Behavior::Disabled)
    }

    /// Sleep before answering, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs of the most recent `generate` call.
    pub fn last_inputs(&self) -> Option<String> {
        self.last_inputs
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        inputs: &str,
        _params: &GenerationParams,
    ) -> Result<serde_json::Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_inputs.lock() {
            *guard = Some(inputs.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Echo => Ok(json!([
                { "generated_text": format!("Mock response for: {}", inputs) }
            ])),
            Behavior::Fixed(value) => Ok(value.clone()),
            Behavior::Fail(message) => Err(ProviderError::NetworkError(message.clone())),
            Behavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.behavior {
            Behavior::Disabled => Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
