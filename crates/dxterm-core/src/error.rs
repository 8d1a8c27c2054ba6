//! Error types for dxterm-core.

use thiserror::Error;

/// Failure to fetch or parse the code-mapping dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset fetch failed: {0}")]
    Fetch(String),

    #[error("dataset has no header row")]
    MissingHeader,

    /// The single load attempt already failed; the store does not retry.
    #[error("dataset unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a suggestion lookup, local or remote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("search request failed: {0}")]
    Request(String),

    #[error("search returned HTTP {0}")]
    Status(u16),

    #[error("search response could not be decoded: {0}")]
    Decode(String),
}
