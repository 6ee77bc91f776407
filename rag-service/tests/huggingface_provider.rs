//! Hugging Face provider against a local stand-in for the Inference API.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use rag_service::services::gateway::GenerationGateway;
use rag_service::services::providers::huggingface::{HuggingFaceConfig, HuggingFaceProvider};
use rag_service::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Captured {
    request: Arc<Mutex<Option<(String, String, Value)>>>,
}

async fn fake_inference(
    State(captured): State<Captured>,
    Path((org, model)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    *captured.request.lock().unwrap() = Some((format!("{}/{}", org, model), auth, body));

    if model == "loading-model" {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "Model loading-model is currently loading"})),
        );
    }
    if model == "busy-model" {
        return (StatusCode::TOO_MANY_REQUESTS, Json(json!({"error": "slow down"})));
    }

    (
        StatusCode::OK,
        Json(json!([{"generated_text": "Grounded answer"}])),
    )
}

async fn spawn_backend() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/models/:org/:model", post(fake_inference))
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (address, captured)
}

fn provider(api_base: &str, model: &str) -> HuggingFaceProvider {
    HuggingFaceProvider::new(HuggingFaceConfig {
        api_token: Some("hf_test".to_string()),
        api_base: api_base.to_string(),
        model: model.to_string(),
    })
    .expect("Failed to create provider")
}

#[tokio::test]
async fn sends_inputs_parameters_and_token() {
    let (address, captured) = spawn_backend().await;
    let params = GenerationParams {
        max_new_tokens: Some(256),
        temperature: Some(0.2),
        top_p: None,
    };

    let gateway = GenerationGateway::new(
        Arc::new(provider(&address, "mistralai/Mistral-7B-Instruct-v0.1")),
        params,
    );
    let text = gateway.infer("SYSTEM:\nhi").await.expect("inference failed");
    assert_eq!(text, "Grounded answer");

    let (model, auth, body) = captured.request.lock().unwrap().clone().unwrap();
    assert_eq!(model, "mistralai/Mistral-7B-Instruct-v0.1");
    assert_eq!(auth, "Bearer hf_test");
    assert_eq!(body["inputs"], "SYSTEM:\nhi");
    assert_eq!(body["parameters"]["max_new_tokens"], 256);
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let (address, _) = spawn_backend().await;

    let err = provider(&address, "org/loading-model")
        .generate("hi", &GenerationParams::default())
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(message) => {
            assert!(message.contains("503"));
            assert!(message.contains("currently loading"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let (address, _) = spawn_backend().await;

    let err = provider(&address, "org/busy-model")
        .generate("hi", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let err = provider("http://127.0.0.1:9", "org/model")
        .generate("hi", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)));
}
