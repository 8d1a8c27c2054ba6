//! Headless lookup: one query, no keystroke stream and so no debounce.

use dxterm_core::{config::Config, search, Selection, SourceError, Suggestion};
use std::io::Write;

/// Run `query` through the configured source and normalize every match.
///
/// Queries shorter than the configured minimum return nothing without
/// touching the dataset or the backend.
pub async fn lookup(config: &Config, query: &str) -> Result<Vec<Selection>, SourceError> {
    if !search::is_searchable(query, config.search.min_query_chars) {
        tracing::debug!(query = %query, "headless: query below minimum length");
        return Ok(Vec::new());
    }
    let (source, _) = dxterm_remote::build_source(config);
    let suggestions = source.suggest(query).await?;
    tracing::info!(query = %query, matches = suggestions.len(), "headless: lookup complete");
    Ok(suggestions.iter().map(Suggestion::to_selection).collect())
}

/// One compact JSON object per line.
pub fn write_json_lines(out: &mut impl Write, selections: &[Selection]) -> anyhow::Result<()> {
    for selection in selections {
        serde_json::to_writer(&mut *out, selection)?;
        writeln!(out)?;
    }
    Ok(())
}
