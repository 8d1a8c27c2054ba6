//! Dataset — the CSV code-mapping table and its lazily loaded store.
//!
//! [`parse_csv`] turns the raw asset into an ordered [`Dataset`] using the
//! header row for column names. [`DatasetStore`] owns one [`DatasetSource`]
//! and makes exactly one fetch+parse attempt for its whole lifetime; every
//! caller after that sees the cached outcome through [`DatasetStore::state`].

use crate::error::DatasetError;
use crate::types::DiagnosisRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Immutable, ordered rows of the code-mapping table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Arc<DiagnosisRecord>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, records: Vec<DiagnosisRecord>) -> Self {
        Self {
            headers,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Arc<DiagnosisRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse CSV text with a header row.
///
/// Field `i` of each row is stored under header `i`. Short rows leave the
/// trailing columns absent and surplus fields are dropped. Blank lines are
/// skipped, as is a leading UTF-8 BOM.
pub fn parse_csv(text: &str) -> Result<Dataset, DatasetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DatasetError::MissingHeader);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let columns: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        records.push(DiagnosisRecord::new(columns));
    }

    tracing::debug!(rows = records.len(), columns = headers.len(), "dataset: csv parsed");
    Ok(Dataset::new(headers, records))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where the raw CSV text comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self) -> Result<String, DatasetError>;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;
}

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String, DatasetError> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Observable load state of a [`DatasetStore`].
#[derive(Debug, Clone)]
pub enum DatasetState {
    Unloaded,
    Loading,
    Ready(Arc<Dataset>),
    Failed(String),
}

/// Owns the dataset for one widget instance (or whoever it is injected into).
pub struct DatasetStore {
    source: Box<dyn DatasetSource>,
    cell: OnceCell<Result<Arc<Dataset>, String>>,
    loading: AtomicBool,
}

impl DatasetStore {
    pub fn new(source: impl DatasetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cell: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// Load the dataset, or return the outcome of the one earlier attempt.
    ///
    /// Concurrent callers wait on the same attempt. A failure is cached and
    /// reported as [`DatasetError::Unavailable`] from then on.
    pub async fn load(&self) -> Result<Arc<Dataset>, DatasetError> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                self.loading.store(true, Ordering::Release);
                let location = self.source.describe();
                tracing::debug!(source = %location, "dataset: loading");

                let result = match self.source.fetch().await {
                    Ok(text) => parse_csv(&text),
                    Err(e) => Err(e),
                };

                match result {
                    Ok(dataset) => {
                        tracing::info!(source = %location, rows = dataset.len(), "dataset: loaded");
                        Ok(Arc::new(dataset))
                    }
                    Err(e) => {
                        tracing::warn!(source = %location, error = %e, "dataset: load failed");
                        Err(e.to_string())
                    }
                }
            })
            .await;
        // Cleared only once the cell holds the outcome, so `state()` never
        // drops back to `Unloaded` mid-load.
        self.loading.store(false, Ordering::Release);

        match outcome {
            Ok(dataset) => Ok(Arc::clone(dataset)),
            Err(reason) => Err(DatasetError::Unavailable(reason.clone())),
        }
    }

    pub fn state(&self) -> DatasetState {
        match self.cell.get() {
            Some(Ok(dataset)) => DatasetState::Ready(Arc::clone(dataset)),
            Some(Err(reason)) => DatasetState::Failed(reason.clone()),
            None if self.loading.load(Ordering::Acquire) => DatasetState::Loading,
            None => DatasetState::Unloaded,
        }
    }
}

impl std::fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetStore")
            .field("source", &self.source.describe())
            .field("state", &self.state())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = "ICD11_Title,ICD11_Code,Ayurveda_NAMC_CODE\n\
                          Cholera,1A00,nan\n\
                          \n\
                          \"Diabetes mellitus, type 2\",5A11,AY-222\n";

    #[test]
    fn parses_rows_in_order_and_skips_blank_lines() {
        let ds = parse_csv(SAMPLE).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].title(), Some("Cholera"));
        assert_eq!(ds.records()[1].title(), Some("Diabetes mellitus, type 2"));
        assert_eq!(ds.records()[1].get("Ayurveda_NAMC_CODE"), Some("AY-222"));
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let ds = parse_csv("ICD11_Title,ICD11_Code,Unani_NUMC_CODE\nFever,MG26\n").unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.get("ICD11_Code"), Some("MG26"));
        assert_eq!(r.get("Unani_NUMC_CODE"), None);
    }

    #[test]
    fn leading_bom_is_ignored() {
        let ds = parse_csv("\u{feff}ICD11_Title,ICD11_Code\nFever,MG26\n").unwrap();
        assert_eq!(ds.headers()[0], "ICD11_Title");
    }

    #[test]
    fn empty_text_has_no_header() {
        assert!(matches!(parse_csv(""), Err(DatasetError::MissingHeader)));
    }

    #[tokio::test]
    async fn file_source_loads_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let store = DatasetStore::new(FileSource::new(file.path()));
        assert!(matches!(store.state(), DatasetState::Unloaded));

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(store.state(), DatasetState::Ready(_)));
    }

    /// Hands out `SAMPLE` once the gate opens.
    struct Gated(Arc<tokio::sync::Notify>);

    #[async_trait]
    impl DatasetSource for Gated {
        async fn fetch(&self) -> Result<String, DatasetError> {
            self.0.notified().await;
            Ok(SAMPLE.to_string())
        }

        fn describe(&self) -> String {
            "gated".into()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn state_never_reverts_to_unloaded_while_loading() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let store = Arc::new(DatasetStore::new(Gated(Arc::clone(&gate))));

        let loader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.load().await.map(|d| d.len()) })
        };
        while !matches!(store.state(), DatasetState::Loading) {
            tokio::task::yield_now().await;
        }

        gate.notify_one();
        let mut seen = Vec::new();
        loop {
            let state = store.state();
            let ready = matches!(state, DatasetState::Ready(_));
            seen.push(std::mem::discriminant(&state));
            if ready {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(loader.await.unwrap().unwrap(), 2);
        let unloaded = std::mem::discriminant(&DatasetState::Unloaded);
        assert!(!seen.contains(&unloaded));
    }

    #[tokio::test]
    async fn missing_file_is_a_cached_failure() {
        let store = DatasetStore::new(FileSource::new("/nonexistent/dxterm/query_database.csv"));
        assert!(store.load().await.is_err());
        assert!(matches!(store.load().await, Err(DatasetError::Unavailable(_))));
        assert!(matches!(store.state(), DatasetState::Failed(_)));
    }
}
