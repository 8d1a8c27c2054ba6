//! Error types for dxterm-remote.

use dxterm_core::SourceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported URL scheme (only http:// is supported): {0}")]
    UnsupportedScheme(String),

    #[error("HTTP request error: {0}")]
    Request(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend refused the request and said why.
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl From<RemoteError> for SourceError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Status(code) | RemoteError::Rejected { status: code, .. } => {
                SourceError::Status(code)
            }
            RemoteError::Json(e) => SourceError::Decode(e.to_string()),
            other => SourceError::Request(other.to_string()),
        }
    }
}
