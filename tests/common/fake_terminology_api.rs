//! Fake terminology backend for integration tests.
//!
//! Spins up a minimal `axum` server on a random port bound to 127.0.0.1.
//! Serves:
//! - `GET /query_database.csv`: the configured CSV asset (404 when unset)
//! - `GET /api/terminology/search?q=`: configured matches whose display
//!   name contains `q`, ignoring case
//! - `POST /api/doctor/consultation`: records the body, replies 201 or the
//!   configured rejection
//!
//! ```rust,no_run
//! let api = FakeTerminologyApi::start().await.unwrap();
//! api.add_match("Diabetes mellitus", &[("ICD-11", "5A10")]).await;
//! let client = RemoteTerminology::new(api.api_url());
//! ```

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct ApiState {
    csv: Option<String>,
    csv_hits: usize,
    matches: Vec<serde_json::Value>,
    search_failure: Option<u16>,
    /// Raw body returned instead of JSON matches.
    search_body_override: Option<String>,
    queries: Vec<String>,
    consultations: Vec<serde_json::Value>,
    consultation_reply: Option<(u16, String)>,
}

type Shared = Arc<Mutex<ApiState>>;

pub struct FakeTerminologyApi {
    addr: SocketAddr,
    state: Shared,
}

impl FakeTerminologyApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state: Shared = Arc::default();

        let app = Router::new()
            .route("/query_database.csv", get(dataset))
            .route("/api/terminology/search", get(search))
            .route("/api/doctor/consultation", post(consultation))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// e.g. `http://127.0.0.1:PORT/api`
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn dataset_url(&self) -> String {
        format!("http://{}/query_database.csv", self.addr)
    }

    pub async fn serve_csv(&self, csv: &str) {
        self.state.lock().await.csv = Some(csv.to_string());
    }

    /// Register a match. `codes` are `(system, code)` pairs using the wire
    /// names, e.g. `("NAMASTE-Ayurveda", "AY-221")`.
    pub async fn add_match(&self, display_name: &str, codes: &[(&str, &str)]) {
        let codes: Vec<_> = codes
            .iter()
            .map(|(system, code)| {
                serde_json::json!({ "system": system, "code": code, "display": display_name })
            })
            .collect();
        self.state
            .lock()
            .await
            .matches
            .push(serde_json::json!({ "displayName": display_name, "codes": codes }));
    }

    pub async fn fail_search(&self, status: u16) {
        self.state.lock().await.search_failure = Some(status);
    }

    pub async fn search_returns_raw(&self, body: &str) {
        self.state.lock().await.search_body_override = Some(body.to_string());
    }

    pub async fn reject_consultation(&self, status: u16, body: &str) {
        self.state.lock().await.consultation_reply = Some((status, body.to_string()));
    }

    pub async fn queries(&self) -> Vec<String> {
        self.state.lock().await.queries.clone()
    }

    pub async fn consultations(&self) -> Vec<serde_json::Value> {
        self.state.lock().await.consultations.clone()
    }

    pub async fn csv_hits(&self) -> usize {
        self.state.lock().await.csv_hits
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn dataset(State(state): State<Shared>) -> Response {
    let mut state = state.lock().await;
    state.csv_hits += 1;
    match state.csv.clone() {
        Some(csv) => ([(header::CONTENT_TYPE, "text/csv")], csv).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search(Query(params): Query<HashMap<String, String>>, State(state): State<Shared>) -> Response {
    let mut state = state.lock().await;
    let q = params.get("q").cloned().unwrap_or_default();
    state.queries.push(q.clone());

    if let Some(status) = state.search_failure {
        return status_code(status).into_response();
    }
    if let Some(body) = state.search_body_override.clone() {
        return ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    }

    let needle = q.to_lowercase();
    let hits: Vec<_> = state
        .matches
        .iter()
        .filter(|m| {
            m["displayName"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(hits).into_response()
}

async fn consultation(State(state): State<Shared>, Json(body): Json<serde_json::Value>) -> Response {
    let mut state = state.lock().await;
    state.consultations.push(body);
    match state.consultation_reply.clone() {
        Some((status, body)) => (status_code(status), body).into_response(),
        None => (StatusCode::CREATED, Json(serde_json::json!({ "status": "saved" }))).into_response(),
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// ---------------------------------------------------------------------------
// Unresponsive backend
// ---------------------------------------------------------------------------

/// A backend that accepts connections and never answers. Returns a base URL
/// in the same shape as [`FakeTerminologyApi::api_url`].
pub async fn silent_backend() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Ok(format!("http://{addr}/api"))
}
