#![allow(dead_code)]

use rag_service::config::{
    CorpusConfig, GenerationConfig, HuggingFaceConfig, ModelConfig, PersonaConfig, RagConfig,
    DEFAULT_CHAT_PROMPT, DEFAULT_SUGGEST_PROMPT, DEFAULT_SYSTEM_PROMPT,
};
use rag_service::services::providers::mock::MockTextProvider;
use rag_service::services::providers::TextProvider;
use rag_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub const SAMPLE_CORPUS: &str = r#"[
    {"title": "Flood risk", "description": "Urban drainage overload"},
    {"title": "Heat islands", "description": "Asphalt raises city temperature"},
    {"title": "Air quality", "description": "Particulate matter near highways"}
]"#;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockTextProvider>,
    corpus_path: PathBuf,
}

/// Configuration that never reads the environment.
pub fn test_config(corpus_path: &str) -> RagConfig {
    RagConfig {
        common: CoreConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0, // Random port for testing
        },
        models: ModelConfig {
            model_id: "mock-model".to_string(),
        },
        huggingface: HuggingFaceConfig {
            api_token: Some("test-token".to_string()),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        corpus: CorpusConfig {
            path: corpus_path.to_string(),
            max_context_chars: None,
        },
        generation: GenerationConfig {
            max_new_tokens: 256,
            temperature: 0.2,
            request_timeout_secs: 5,
        },
        persona: PersonaConfig {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            chat_prompt: DEFAULT_CHAT_PROMPT.to_string(),
            suggest_prompt: DEFAULT_SUGGEST_PROMPT.to_string(),
        },
    }
}

impl TestApp {
    /// Spawn with the echo provider and the sample corpus.
    pub async fn spawn() -> Self {
        Self::spawn_with(MockTextProvider::echo(), Some(SAMPLE_CORPUS)).await
    }

    /// Spawn with a given provider. `corpus: None` points at a missing file.
    pub async fn spawn_with(provider: MockTextProvider, corpus: Option<&str>) -> Self {
        let corpus_path = std::env::temp_dir().join(format!("rag-test-corpus-{}.json", Uuid::new_v4()));
        if let Some(contents) = corpus {
            tokio::fs::write(&corpus_path, contents)
                .await
                .expect("Failed to write test corpus");
        }

        let provider = Arc::new(provider);
        let config = test_config(corpus_path.to_str().expect("Non UTF-8 temp path"));

        let app = Application::build_with_provider(config, provider.clone() as Arc<dyn TextProvider>)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
            corpus_path,
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_file(&self.corpus_path).await;
    }
}
