//! Search layer — case-insensitive title matching over the in-memory dataset.
//!
//! No ranking beyond dataset order and no fuzzy matching: a record matches when
//! its title contains the query, ignoring case. The first
//! [`MatchOptions::max_suggestions`] matches win.

use crate::types::DiagnosisRecord;
use std::sync::Arc;

pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Queries with fewer characters than this never match anything.
    pub min_query_chars: usize,
    pub max_suggestions: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// True when `query` is long enough to be searched. Length is counted in
/// characters, not bytes.
pub fn is_searchable(query: &str, min_query_chars: usize) -> bool {
    !query.is_empty() && query.chars().count() >= min_query_chars
}

/// Case-insensitive containment test against a record's title.
pub fn title_matches(record: &DiagnosisRecord, lowered_query: &str) -> bool {
    record
        .title()
        .is_some_and(|title| title.to_lowercase().contains(lowered_query))
}

/// Return the first matching records in dataset order.
pub fn filter_records(
    records: &[Arc<DiagnosisRecord>],
    query: &str,
    opts: &MatchOptions,
) -> Vec<Arc<DiagnosisRecord>> {
    if !is_searchable(query, opts.min_query_chars) {
        return Vec::new();
    }

    let lowered = query.to_lowercase();
    let matches: Vec<_> = records
        .iter()
        .filter(|r| title_matches(r, &lowered))
        .take(opts.max_suggestions)
        .cloned()
        .collect();

    tracing::debug!(query = %query, matches = matches.len(), "search: filtered");
    matches
}
