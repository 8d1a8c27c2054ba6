//! Minimal HTTP/1 client over `hyper-util`'s pooled legacy client.
//!
//! Bodies are small (a CSV asset, a JSON array, a JSON form body) so responses
//! are collected into memory in one go. Every request, connect through the
//! last body byte, is bounded by the client's timeout.

use crate::error::{RemoteError, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{header, Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Used when no `[api] timeout_ms` is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully collected response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client<HttpConnector, Full<Bytes>>,
    timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        Self {
            inner: Client::builder(TokioExecutor::new()).build(connector),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get(&self, url: &str, accept: &str) -> Result<HttpResponse> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(parse_http_uri(url)?)
            .header(header::ACCEPT, accept)
            .body(Full::new(Bytes::new()))
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        self.send(req).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<HttpResponse> {
        let payload = serde_json::to_vec(body)?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(parse_http_uri(url)?)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(Bytes::from(payload)))
            .map_err(|e| RemoteError::Request(e.to_string()))?;
        self.send(req).await
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<HttpResponse> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        let exchange = async {
            let resp = self
                .inner
                .request(req)
                .await
                .map_err(|e| RemoteError::Request(e.to_string()))?;
            let status = resp.status();
            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| RemoteError::Request(e.to_string()))?
                .to_bytes();
            Ok::<_, RemoteError>(HttpResponse { status, body })
        };

        let resp = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(resp) => resp?,
            Err(_) => {
                tracing::warn!(%method, %uri, timeout_ms = self.timeout.as_millis() as u64, "http: timed out");
                return Err(RemoteError::Request(format!(
                    "no response within {} ms",
                    self.timeout.as_millis()
                )));
            }
        };

        tracing::debug!(%method, %uri, status = resp.status.as_u16(), bytes = resp.body.len(), "http: response");
        Ok(resp)
    }
}

/// Join `base` and `path` with exactly one slash between them.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn parse_http_uri(url: &str) -> Result<Uri> {
    let uri: Uri = url
        .parse()
        .map_err(|e| RemoteError::InvalidUrl(format!("{url}: {e}")))?;
    match uri.scheme_str() {
        Some("http") => Ok(uri),
        _ => Err(RemoteError::UnsupportedScheme(url.to_string())),
    }
}
