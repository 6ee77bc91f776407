//! Application startup and lifecycle management.

use crate::config::RagConfig;
use crate::handlers;
use crate::models::prompt::contains_section_label;
use crate::middleware::metrics_middleware;
use crate::services::providers::huggingface::{HuggingFaceConfig, HuggingFaceProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::{CorpusStore, GenerationGateway, RagPipeline};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

/// Build the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/generate", post(handlers::generate))
        .route("/api/chat", post(handlers::chat))
        .route("/api/suggest", post(handlers::suggest))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Hugging Face backend from `config`.
    pub async fn build(config: RagConfig) -> Result<Self, AppError> {
        if !config.has_api_token() {
            tracing::warn!("HF_TOKEN is not set; generation requests will fail until it is configured");
        }

        let provider = HuggingFaceProvider::new(HuggingFaceConfig {
            api_token: config.huggingface.api_token.clone(),
            api_base: config.huggingface.api_base.clone(),
            model: config.models.model_id.clone(),
        })
        .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        tracing::info!(
            model = %config.models.model_id,
            "Initialized Hugging Face text provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an arbitrary provider (tests use the mock).
    pub async fn build_with_provider(
        config: RagConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        let corpus = Arc::new(CorpusStore::from_path(&config.corpus.path));
        // Warm the corpus so the first request does not pay for the read.
        let records = corpus.records().await;
        tracing::info!(
            path = %config.corpus.path,
            records = records.len(),
            "Corpus ready"
        );

        let params = GenerationParams {
            max_new_tokens: Some(config.generation.max_new_tokens),
            temperature: Some(config.generation.temperature),
            top_p: None,
        };
        let mut gateway = GenerationGateway::new(provider, params);
        if config.generation.request_timeout_secs > 0 {
            gateway =
                gateway.with_timeout(Duration::from_secs(config.generation.request_timeout_secs));
        }

        if let Some(limit) = config.corpus.max_context_chars {
            tracing::warn!(
                limit,
                "Retrieved context is capped; matched records may be truncated"
            );
        }

        if contains_section_label(&config.persona.system_prompt) {
            tracing::warn!("AURORA_SYSTEM_PROMPT contains a prompt section label line");
        }

        let pipeline = RagPipeline::new(corpus, gateway, config.persona.system_prompt.clone())
            .with_chat_prompt(config.persona.chat_prompt.clone())
            .with_suggest_prompt(config.persona.suggest_prompt.clone())
            .with_max_context_chars(config.corpus.max_context_chars);

        let state = AppState {
            pipeline: Arc::new(pipeline),
        };

        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router: router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
