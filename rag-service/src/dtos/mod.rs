//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "Field 'prompt' must not be empty"))]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Field 'message' must not be empty"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestRequest {
    #[validate(length(min = 1, message = "Field 'problem_text' must not be empty"))]
    pub problem_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub solution: String,
}
