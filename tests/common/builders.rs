//! Test builders: records, dataset files, stores and pipelines.
//!
//! These panic on invalid input rather than returning `Result`.

use async_trait::async_trait;
use dxterm_core::{
    config::Config,
    dataset::{DatasetSource, DatasetStore, FileSource},
    pipeline::{CsvSource, PipelineOptions},
    search::MatchOptions,
    DatasetError, DiagnosisRecord, QueryPipeline, SourceError, Suggestion, SuggestionSource,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a [`DiagnosisRecord`] with the standard columns.
///
/// ```rust
/// let record = RecordBuilder::new("Diabetes mellitus").icd11("5A10").ayurveda("AY-221").build();
/// ```
pub struct RecordBuilder {
    columns: Vec<(String, String)>,
}

impl RecordBuilder {
    pub fn new(title: &str) -> Self {
        Self { columns: vec![("ICD11_Title".into(), title.into())] }
    }

    pub fn column(mut self, name: &str, value: &str) -> Self {
        self.columns.push((name.into(), value.into()));
        self
    }

    pub fn icd11(self, code: &str) -> Self {
        self.column("ICD11_Code", code)
    }

    pub fn ayurveda(self, code: &str) -> Self {
        self.column("Ayurveda_NAMC_CODE", code)
    }

    pub fn siddha(self, code: &str) -> Self {
        self.column("Siddha_NAMC_CODE", code)
    }

    pub fn unani(self, code: &str) -> Self {
        self.column("Unani_NUMC_CODE", code)
    }

    pub fn build(self) -> DiagnosisRecord {
        self.columns.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// Write `csv` to a temp file. Keep the handle alive for the test's duration.
pub fn dataset_file(csv: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp dataset");
    file.write_all(csv.as_bytes()).expect("write temp dataset");
    file
}

/// A dataset source that serves fixed text (or a fixed error) and counts how
/// often it was fetched.
#[derive(Clone)]
pub struct CountingSource {
    body: Result<String, String>,
    fetches: Arc<AtomicUsize>,
    delay: Duration,
}

impl CountingSource {
    pub fn ok(csv: &str) -> Self {
        Self { body: Ok(csv.to_string()), fetches: Arc::default(), delay: Duration::ZERO }
    }

    pub fn failing(reason: &str) -> Self {
        Self { body: Err(reason.to_string()), fetches: Arc::default(), delay: Duration::ZERO }
    }

    /// Hold every fetch for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for CountingSource {
    async fn fetch(&self) -> Result<String, DatasetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.body.clone().map_err(DatasetError::Fetch)
    }

    fn describe(&self) -> String {
        "counting-source".to_string()
    }
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

/// A local-mode pipeline over `store` with the default config.
pub fn local_pipeline(store: Arc<DatasetStore>) -> QueryPipeline {
    let config = Config::defaults();
    let source = CsvSource::new(store, config.search.match_options());
    QueryPipeline::new(Arc::new(source), PipelineOptions::local(&config))
}

/// A local-mode pipeline reading `csv` through a [`CountingSource`].
pub fn local_pipeline_over(csv: &str) -> (QueryPipeline, CountingSource) {
    let source = CountingSource::ok(csv);
    let store = Arc::new(DatasetStore::new(source.clone()));
    (local_pipeline(store), source)
}

/// A store over a temp file on disk.
pub fn file_store(file: &tempfile::NamedTempFile) -> DatasetStore {
    DatasetStore::new(FileSource::new(file.path()))
}

pub fn default_match_options() -> MatchOptions {
    MatchOptions::default()
}

/// A suggestion source that answers each query after a per-query delay, so
/// tests can make an older request finish after a newer one.
pub struct DelayedSource {
    delays: Vec<(String, Duration)>,
    pub calls: Arc<AtomicUsize>,
}

impl DelayedSource {
    pub fn new(delays: &[(&str, u64)]) -> Self {
        Self {
            delays: delays
                .iter()
                .map(|(q, ms)| (q.to_string(), Duration::from_millis(*ms)))
                .collect(),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl SuggestionSource for DelayedSource {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self
            .delays
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, d)| *d)
            .unwrap_or_default();
        tokio::time::sleep(delay).await;
        let record = RecordBuilder::new(&format!("{query} result")).icd11("X").build();
        Ok(vec![Suggestion::Record(Arc::new(record))])
    }
}
