//! Dataset source that fetches the CSV as a static asset over HTTP.

use crate::http::HttpClient;
use async_trait::async_trait;
use dxterm_core::dataset::DatasetSource;
use dxterm_core::DatasetError;

#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    http: HttpClient,
    url: String,
}

impl HttpDatasetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), url)
    }

    pub fn with_client(http: HttpClient, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<String, DatasetError> {
        let resp = self
            .http
            .get(&self.url, "text/csv")
            .await
            .map_err(|e| DatasetError::Fetch(e.to_string()))?;
        if !resp.is_success() {
            return Err(DatasetError::Fetch(format!("HTTP {}", resp.status.as_u16())));
        }
        String::from_utf8(resp.body.to_vec()).map_err(|e| DatasetError::Fetch(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
