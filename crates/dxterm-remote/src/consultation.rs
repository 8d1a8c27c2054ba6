//! Consultation submit — posts a finished draft to the backend.

use crate::error::{RemoteError, Result};
use crate::http::{endpoint, HttpClient};
use dxterm_core::consultation::ConsultationDraft;

pub const CONSULTATION_PATH: &str = "/doctor/consultation";

/// Shown when the backend gives no reason of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to save consultation.";

#[derive(Debug, Clone)]
pub struct ConsultationClient {
    http: HttpClient,
    base_url: String,
}

impl ConsultationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    pub async fn submit(&self, draft: &ConsultationDraft) -> Result<()> {
        let url = endpoint(&self.base_url, CONSULTATION_PATH);
        let resp = self.http.post_json(&url, draft).await?;
        if resp.is_success() {
            tracing::info!(
                patient = %draft.patient_identifier,
                diagnoses = draft.filled_diagnoses(),
                "consultation: saved"
            );
            return Ok(());
        }

        let message = serde_json::from_slice::<serde_json::Value>(&resp.body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        Err(RemoteError::Rejected { status: resp.status.as_u16(), message })
    }
}

/// The inline message a form shows for a failed submit.
pub fn failure_message(err: &RemoteError) -> String {
    match err {
        RemoteError::Rejected { message, .. } => message.clone(),
        _ => DEFAULT_FAILURE_MESSAGE.to_string(),
    }
}
