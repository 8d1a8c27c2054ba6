//! dxterm-core — diagnosis terminology matcher core library.
//!
//! This crate exposes the layers behind the diagnosis autocomplete as public
//! modules, plus the shared types used across all of them.
//!
//! # Architecture
//!
//! ```text
//! DatasetSource ──► DatasetStore ──► CsvSource ─┐
//!                                               ├──► QueryPipeline ──► Selection ──► ConsultationDraft
//!                       (remote crate) source ──┘
//! ```
//!
//! Timer and lookup tasks talk to the pipeline over `tokio` channels; only the
//! owner of the pipeline mutates query state.

pub mod config;
pub mod consultation;
pub mod dataset;
pub mod debounce;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod search;
pub mod types;

pub use error::{DatasetError, SourceError};
pub use pipeline::{QueryPipeline, QueryState, SearchStatus, SuggestionSource};
pub use types::{CodeEntry, CodingSystem, DiagnosisRecord, Selection, Suggestion, TerminologyMatch};
