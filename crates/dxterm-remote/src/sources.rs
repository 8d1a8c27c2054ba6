//! Wiring: pick the suggestion source and pipeline options from [`Config`].

use crate::dataset::HttpDatasetSource;
use crate::http::HttpClient;
use crate::terminology::RemoteTerminology;
use dxterm_core::config::{Config, SearchMode};
use dxterm_core::dataset::{DatasetStore, FileSource};
use dxterm_core::pipeline::{CsvSource, PipelineOptions};
use dxterm_core::SuggestionSource;
use std::sync::Arc;

/// A store for `location`: `http://` / `https://` URLs are fetched over HTTP,
/// anything else is read from disk.
pub fn dataset_store(location: &str, http: &HttpClient) -> DatasetStore {
    if location.starts_with("http://") || location.starts_with("https://") {
        DatasetStore::new(HttpDatasetSource::with_client(http.clone(), location))
    } else {
        DatasetStore::new(FileSource::new(location))
    }
}

/// The source and debounce behaviour for the configured [`SearchMode`].
pub fn build_source(config: &Config) -> (Arc<dyn SuggestionSource>, PipelineOptions) {
    let http = HttpClient::with_timeout(config.api.timeout());
    match config.search.mode {
        SearchMode::Local => {
            let store = Arc::new(dataset_store(&config.dataset.location, &http));
            tracing::debug!(location = %config.dataset.location, "sources: local csv");
            (
                Arc::new(CsvSource::new(store, config.search.match_options())),
                PipelineOptions::local(config),
            )
        }
        SearchMode::Remote => {
            tracing::debug!(base_url = %config.api.base_url, "sources: remote terminology");
            (
                Arc::new(RemoteTerminology::with_client(http, config.api.base_url.clone())),
                PipelineOptions::remote(config),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn local_mode_uses_local_quiet_period() {
        let (_, opts) = build_source(&Config::defaults());
        assert_eq!(opts.quiet, Duration::from_millis(300));
        assert!(!opts.clear_short_immediately);
    }

    #[test]
    fn remote_mode_uses_remote_quiet_period() {
        let mut cfg = Config::defaults();
        cfg.search.mode = SearchMode::Remote;
        let (_, opts) = build_source(&cfg);
        assert_eq!(opts.quiet, Duration::from_millis(500));
        assert!(opts.clear_short_immediately);
    }
}
