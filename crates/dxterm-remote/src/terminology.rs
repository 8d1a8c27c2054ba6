//! Remote terminology search — the server-backed variant of the matcher.
//!
//! Matching happens entirely on the backend; this side only encodes the query
//! and decodes `[{ displayName, codes }]`.

use crate::error::{RemoteError, Result};
use crate::http::{endpoint, HttpClient};
use async_trait::async_trait;
use dxterm_core::{SourceError, Suggestion, SuggestionSource, TerminologyMatch};

pub const SEARCH_PATH: &str = "/terminology/search";

#[derive(Debug, Clone)]
pub struct RemoteTerminology {
    http: HttpClient,
    base_url: String,
}

impl RemoteTerminology {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// `GET {base}/terminology/search?q=<percent-encoded query>`.
    pub fn search_url(&self, query: &str) -> String {
        format!("{}?q={}", endpoint(&self.base_url, SEARCH_PATH), urlencoding::encode(query))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<TerminologyMatch>> {
        let resp = self.http.get(&self.search_url(query), "application/json").await?;
        if !resp.is_success() {
            return Err(RemoteError::Status(resp.status.as_u16()));
        }
        let matches: Vec<TerminologyMatch> = resp.json()?;
        tracing::debug!(query = %query, matches = matches.len(), "terminology: search complete");
        Ok(matches)
    }
}

#[async_trait]
impl SuggestionSource for RemoteTerminology {
    async fn suggest(&self, query: &str) -> std::result::Result<Vec<Suggestion>, SourceError> {
        let matches = self.search(query).await?;
        Ok(matches.into_iter().map(Suggestion::Remote).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded() {
        let t = RemoteTerminology::new("http://127.0.0.1:5000/api/");
        assert_eq!(
            t.search_url("type 2 & more"),
            "http://127.0.0.1:5000/api/terminology/search?q=type%202%20%26%20more"
        );
    }
}
