//! Domain models for the RAG service.

pub mod prompt;
pub mod record;

pub use prompt::CompositePrompt;
pub use record::{MatchSet, Record};
