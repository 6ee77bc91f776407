//! Substring relevance matching over the corpus.

use crate::models::{MatchSet, Record};

/// Upper bound on records injected into a prompt.
pub const MAX_MATCHES: usize = 3;

/// Select up to [`MAX_MATCHES`] records whose lower-cased
/// `title + " " + description` contains the trimmed, lower-cased query.
///
/// Corpus order is kept; there is no scoring. An empty query is a substring
/// of everything and therefore returns the first records of the corpus.
pub fn match_records(records: &[Record], query: &str) -> MatchSet {
    let needle = query.trim().to_lowercase();

    records
        .iter()
        .filter(|record| record.searchable_text().contains(&needle))
        .take(MAX_MATCHES)
        .cloned()
        .collect()
}
