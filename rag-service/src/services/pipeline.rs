//! Retrieval-augmented generation pipeline.
//!
//! Sequence per request: load corpus, match, compose, infer. Corpus problems
//! degrade to "no relevant data"; backend problems surface as a single
//! [`GenerationError`].

use crate::config::{DEFAULT_CHAT_PROMPT, DEFAULT_SUGGEST_PROMPT};
use crate::services::composer;
use crate::services::corpus::CorpusStore;
use crate::services::gateway::{GenerationError, GenerationGateway};
use crate::services::matcher::match_records;
use crate::services::metrics;
use std::sync::Arc;

pub struct RagPipeline {
    corpus: Arc<CorpusStore>,
    gateway: GenerationGateway,
    system_prompt: String,
    chat_prompt: String,
    suggest_prompt: String,
    max_context_chars: Option<usize>,
}

impl RagPipeline {
    pub fn new(
        corpus: Arc<CorpusStore>,
        gateway: GenerationGateway,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            corpus,
            gateway,
            system_prompt: system_prompt.into(),
            chat_prompt: DEFAULT_CHAT_PROMPT.to_string(),
            suggest_prompt: DEFAULT_SUGGEST_PROMPT.to_string(),
            max_context_chars: None,
        }
    }

    pub fn with_chat_prompt(mut self, chat_prompt: impl Into<String>) -> Self {
        self.chat_prompt = chat_prompt.into();
        self
    }

    pub fn with_suggest_prompt(mut self, suggest_prompt: impl Into<String>) -> Self {
        self.suggest_prompt = suggest_prompt.into();
        self
    }

    /// Cap the rendered data section. `None` keeps it uncapped.
    pub fn with_max_context_chars(mut self, max_context_chars: Option<usize>) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn gateway(&self) -> &GenerationGateway {
        &self.gateway
    }

    /// Answer `prompt` grounded in the corpus.
    #[tracing::instrument(
        skip(self, prompt),
        fields(prompt_len = prompt.len(), matched = tracing::field::Empty)
    )]
    pub async fn generate_from_prompt(&self, prompt: &str) -> Result<String, GenerationError> {
        let records = self.corpus.records().await;
        let matches = match_records(&records, prompt);

        tracing::Span::current().record("matched", matches.len());
        metrics::record_matches(matches.len());

        let composite = composer::compose_with_limit(
            &self.system_prompt,
            &matches,
            prompt,
            self.max_context_chars,
        );

        let inputs = composite.render();
        tracing::debug!(
            corpus_size = records.len(),
            composite_len = inputs.len(),
            "Composed prompt"
        );

        self.gateway.infer(&inputs).await
    }

    /// Persona chat without retrieval.
    #[tracing::instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn chat(&self, message: &str) -> Result<String, GenerationError> {
        let inputs = composer::render_chat(&self.chat_prompt, message);
        self.gateway.infer(&inputs).await
    }

    /// Ask the model for a solution to an environmental problem.
    #[tracing::instrument(skip(self, problem), fields(problem_len = problem.len()))]
    pub async fn suggest(&self, problem: &str) -> Result<String, GenerationError> {
        let inputs = composer::render_suggestion(&self.suggest_prompt, problem);
        self.gateway.infer(&inputs).await
    }
}
