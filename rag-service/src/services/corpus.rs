//! File-backed knowledge corpus.
//!
//! The corpus is read once and shared read-only between requests. A missing
//! or malformed file degrades to an empty corpus instead of failing the
//! pipeline, so the service keeps answering without retrieved context.

use crate::models::prompt::contains_section_label;
use crate::models::Record;
use crate::services::metrics;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Error type for corpus loading. Never leaves this module except in logs.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Failed to read corpus file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse corpus file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

enum Source {
    File(PathBuf),
    Memory,
}

/// Immutable collection of [`Record`]s, loaded lazily on first use.
pub struct CorpusStore {
    source: Source,
    records: OnceCell<Arc<[Record]>>,
}

impl CorpusStore {
    /// Corpus backed by a JSON array file. Nothing is read until first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
            records: OnceCell::new(),
        }
    }

    /// In-memory corpus, mostly for tests.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            source: Source::Memory,
            records: OnceCell::new_with(Some(records.into())),
        }
    }

    /// Return the records, reading the backing file on the first call.
    pub async fn records(&self) -> Arc<[Record]> {
        self.records
            .get_or_init(|| async {
                let records = match &self.source {
                    Source::File(path) => load_or_empty(path).await,
                    Source::Memory => Vec::new(),
                };
                Arc::<[Record]>::from(records)
            })
            .await
            .clone()
    }

    /// Whether the records are already in memory.
    pub fn is_loaded(&self) -> bool {
        self.records.initialized()
    }
}

/// Read the corpus, logging and swallowing any failure.
pub async fn load_or_empty(path: &Path) -> Vec<Record> {
    match load(path).await {
        Ok(records) => {
            tracing::info!(path = %path.display(), records = records.len(), "Loaded corpus");
            let labeled = records
                .iter()
                .filter(|r| {
                    contains_section_label(&r.title) || contains_section_label(&r.description)
                })
                .count();
            if labeled > 0 {
                tracing::warn!(
                    records = labeled,
                    "Corpus records contain prompt section labels"
                );
            }
            metrics::set_corpus_records(records.len());
            records
        }
        Err(e) => {
            tracing::error!(error = %e, "Corpus unavailable, continuing with empty corpus");
            metrics::record_corpus_load_error();
            Vec::new()
        }
    }
}

/// Read and parse a JSON array of records.
pub async fn load(path: &Path) -> Result<Vec<Record>, CorpusError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CorpusError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    // Non-object entries carry no title/description; keep them as empty
    // records so positions stay aligned with the source file.
    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .collect())
}
