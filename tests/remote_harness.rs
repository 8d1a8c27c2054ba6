//! Remote terminology harness, against the fake backend.
//!
//! # What this covers
//!
//! - **Wire format**: `GET /terminology/search?q=` with a percent-encoded
//!   query; `[{ displayName, codes }]` decoded into suggestions.
//! - **Failures**: non-2xx status and undecodable bodies become errors, and
//!   in the pipeline an explicit `Unavailable` state.
//! - **Timeouts**: a backend that accepts and never answers fails the request
//!   after `[api] timeout_ms` instead of hanging.
//! - **Debounced pipeline**: short queries never reach the backend.
//!
//! # Running
//!
//! ```sh
//! cargo test --test remote_harness
//! ```

mod common;
use common::fake_terminology_api::{silent_backend, FakeTerminologyApi};
use common::*;
use dxterm_core::{
    config::{Config, SearchMode},
    normalizer, CodingSystem, SearchStatus, SourceError, SuggestionSource, QueryPipeline,
};
use dxterm_remote::{build_source, HttpClient, RemoteError, RemoteTerminology};
use std::time::{Duration, Instant};
use pretty_assertions::assert_eq;

async fn api_with_matches() -> FakeTerminologyApi {
    let api = FakeTerminologyApi::start().await.unwrap();
    api.add_match(
        "Diabetes mellitus",
        &[("ICD-11", "5A10"), ("NAMASTE-Ayurveda", "AY-221"), ("NAMASTE-Siddha", "nan")],
    )
    .await;
    api.add_match("Jwara (fever)", &[("NAMASTE-Siddha", "SD-002"), ("NAMASTE-Unani", "UN-003")])
        .await;
    api
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_decodes_matches() {
    let api = api_with_matches().await;
    let client = RemoteTerminology::new(api.api_url());

    let matches = client.search("diab").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].display_name, "Diabetes mellitus");
    assert_eq!(matches[0].codes.len(), 3);

    let selection = normalizer::from_match(&matches[0]);
    assert_codes!(
        selection,
        [(CodingSystem::Icd11, "5A10"), (CodingSystem::Ayurveda, "AY-221")]
    );
}

#[tokio::test]
async fn query_reaches_backend_decoded() {
    let api = api_with_matches().await;
    let client = RemoteTerminology::new(api.api_url());

    client.search("jwara (fever) & chills").await.unwrap();

    assert_eq!(api.queries().await, vec!["jwara (fever) & chills"]);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let api = api_with_matches().await;
    let client = RemoteTerminology::new(format!("{}/", api.api_url()));
    assert_eq!(client.search("fever").await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_2xx_is_a_status_error() {
    let api = api_with_matches().await;
    api.fail_search(503).await;
    let client = RemoteTerminology::new(api.api_url());

    assert!(matches!(client.search("diab").await, Err(RemoteError::Status(503))));
    assert_eq!(client.suggest("diab").await.unwrap_err(), SourceError::Status(503));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let api = api_with_matches().await;
    api.search_returns_raw(r#"{"not":"an array"}"#).await;
    let client = RemoteTerminology::new(api.api_url());

    assert!(matches!(client.suggest("diab").await, Err(SourceError::Decode(_))));
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let client = RemoteTerminology::new(format!("http://127.0.0.1:{port}/api"));

    assert!(matches!(client.suggest("diab").await, Err(SourceError::Request(_))));
}

#[tokio::test]
async fn silent_backend_times_out() {
    let base = silent_backend().await.unwrap();
    let client = RemoteTerminology::with_client(HttpClient::with_timeout(Duration::from_millis(300)), base);

    let started = Instant::now();
    let result = tokio::time::timeout(Duration::from_secs(5), client.suggest("diabetes"))
        .await
        .expect("search must give up on its own");

    assert!(matches!(result, Err(SourceError::Request(_))), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(2));
}

// ---------------------------------------------------------------------------
// Pipeline over the remote source
// ---------------------------------------------------------------------------

fn remote_config(api: &FakeTerminologyApi) -> Config {
    let mut config = Config::defaults();
    config.search.mode = SearchMode::Remote;
    config.api.base_url = api.api_url();
    config
}

#[tokio::test]
async fn remote_pipeline_end_to_end() {
    let api = api_with_matches().await;
    let (source, opts) = build_source(&remote_config(&api));
    let mut pipeline = QueryPipeline::new(source, opts);

    pipeline.input("j");
    pipeline.input("jw");
    pipeline.input("jwa");
    pipeline.settle().await;

    assert_titles!(pipeline.state().suggestions, ["Jwara (fever)"]);
    assert_eq!(api.queries().await, vec!["jwa"]);

    let selection = pipeline.select(0).unwrap();
    assert_codes!(selection, [(CodingSystem::Siddha, "SD-002"), (CodingSystem::Unani, "UN-003")]);
    // The remote widget clears its input after a pick.
    assert_eq!(pipeline.state().text, "");
}

#[tokio::test]
async fn remote_short_queries_never_hit_backend() {
    let api = api_with_matches().await;
    let (source, opts) = build_source(&remote_config(&api));
    let mut pipeline = QueryPipeline::new(source, opts);

    pipeline.input("j");
    pipeline.input("jw");
    pipeline.settle().await;

    assert!(api.queries().await.is_empty());
    assert!(pipeline.state().suggestions.is_empty());
}

#[tokio::test]
async fn remote_failure_is_unavailable_not_empty() {
    let api = api_with_matches().await;
    api.fail_search(500).await;
    let (source, opts) = build_source(&remote_config(&api));
    let mut pipeline = QueryPipeline::new(source, opts);

    pipeline.input("diab");
    pipeline.settle().await;

    assert_status!(pipeline, SearchStatus::Unavailable(_));
    assert!(pipeline.state().suggestions.is_empty());
}

#[tokio::test]
async fn silent_backend_leaves_pipeline_unavailable() {
    let mut config = Config::defaults();
    config.search.mode = SearchMode::Remote;
    config.api.base_url = silent_backend().await.unwrap();
    config.api.timeout_ms = 300;
    let (source, opts) = build_source(&config);
    let mut pipeline = QueryPipeline::new(source, opts);

    pipeline.input("diabetes");
    tokio::time::timeout(Duration::from_secs(5), pipeline.settle())
        .await
        .expect("pipeline settles once the request times out");

    assert_status!(pipeline, SearchStatus::Unavailable(_));
    assert!(!pipeline.is_busy());
}

// ---------------------------------------------------------------------------
// Local source over an HTTP-hosted dataset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn local_mode_can_fetch_dataset_over_http() {
    let api = FakeTerminologyApi::start().await.unwrap();
    api.serve_csv(CSV_SMALL).await;
    let mut config = Config::defaults();
    config.dataset.location = api.dataset_url();

    let (source, opts) = build_source(&config);
    let mut pipeline = QueryPipeline::new(source, opts);
    pipeline.input("hyper");
    pipeline.settle().await;
    pipeline.input("migr");
    pipeline.settle().await;

    assert_titles!(pipeline.state().suggestions, ["Migraine"]);
    assert_eq!(api.csv_hits().await, 1);
}
