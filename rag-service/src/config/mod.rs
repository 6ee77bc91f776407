use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default Hugging Face instruct model used when `MODEL_ID` is not set.
const DEFAULT_MODEL_ID: &str = "mistralai/Mistral-7B-Instruct-v0.1";

const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";

/// Corpus location, relative to the process working directory.
const DEFAULT_CORPUS_PATH: &str = "data/nasa_dataset.json";

const DEFAULT_MAX_NEW_TOKENS: u32 = 256;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Aurora v7, a technical assistant for the NASA Space Apps challenge. \
Use only the information provided in the RELEVANT DATA section to answer whenever possible. \
If nothing there is relevant, say clearly that there is not enough data and suggest how the information could be obtained.";

pub const DEFAULT_SUGGEST_PROMPT: &str =
    "Propose a solution for the following environmental problem:";

pub const DEFAULT_CHAT_PROMPT: &str = "You are Aurora, a researcher and environmental specialist with deep knowledge of urban \
environmental issues, always linking your insights to sociology. Respond in clear, academic, fluent English. \
When asked to summarize, write around 10 lines and finish with a single keyword that represents the main solution.";

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub huggingface: HuggingFaceConfig,
    pub corpus: CorpusConfig,
    pub generation: GenerationConfig,
    pub persona: PersonaConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Backend model identifier (e.g., mistralai/Mistral-7B-Instruct-v0.1)
    pub model_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HuggingFaceConfig {
    /// Access token. A missing token only fails at the first backend call.
    pub api_token: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    pub path: String,
    /// Upper bound on the rendered data section. `None` leaves it uncapped.
    pub max_context_chars: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonaConfig {
    pub system_prompt: String,
    pub chat_prompt: String,
    /// Prefix for `/api/suggest` problem statements.
    pub suggest_prompt: String,
}

impl RagConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        // A missing token is not fatal; the provider reports it on first use.
        let api_token = env::var("HF_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(RagConfig {
            common: common_config,
            models: ModelConfig {
                model_id: env_or("MODEL_ID", DEFAULT_MODEL_ID),
            },
            huggingface: HuggingFaceConfig {
                api_token,
                api_base: env_or("HF_API_BASE", DEFAULT_HF_API_BASE),
            },
            corpus: CorpusConfig {
                path: env_or("RAG_CORPUS_PATH", DEFAULT_CORPUS_PATH),
                max_context_chars: Some(parse_env::<usize>("RAG_MAX_CONTEXT_CHARS", 0))
                    .filter(|&n| n > 0),
            },
            generation: GenerationConfig {
                max_new_tokens: parse_env("GENAI_MAX_NEW_TOKENS", DEFAULT_MAX_NEW_TOKENS),
                temperature: parse_env("GENAI_TEMPERATURE", DEFAULT_TEMPERATURE),
                request_timeout_secs: parse_env(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                ),
            },
            persona: PersonaConfig {
                system_prompt: env_or("AURORA_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
                chat_prompt: env_or("AURORA_CHAT_PROMPT", DEFAULT_CHAT_PROMPT),
                suggest_prompt: env_or("AURORA_SUGGEST_PROMPT", DEFAULT_SUGGEST_PROMPT),
            },
        })
    }

    /// Whether a backend credential is available.
    pub fn has_api_token(&self) -> bool {
        self.huggingface.api_token.is_some()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric variable, falling back to the default when unset or malformed.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed numeric setting");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_to_default() {
        assert_eq!(env_or("RAG_TEST_UNSET_VARIABLE", "fallback"), "fallback");
    }

    #[test]
    fn parse_env_ignores_malformed_values() {
        std::env::set_var("RAG_TEST_MALFORMED_NUMBER", "not-a-number");
        let value: u32 = parse_env("RAG_TEST_MALFORMED_NUMBER", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn malformed_context_cap_leaves_prompt_uncapped() {
        std::env::set_var("RAG_MAX_CONTEXT_CHARS", "lots");
        let config = RagConfig::load().expect("load should tolerate a malformed cap");
        std::env::remove_var("RAG_MAX_CONTEXT_CHARS");

        assert_eq!(config.corpus.max_context_chars, None);
    }

    #[test]
    fn missing_token_does_not_prevent_startup_in_prod() {
        std::env::set_var("ENVIRONMENT", "prod");
        std::env::remove_var("HF_TOKEN");

        let result = RagConfig::load();
        std::env::remove_var("ENVIRONMENT");

        let config = result.expect("load should succeed without a token");
        assert!(!config.has_api_token());
    }
}
