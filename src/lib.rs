//! dxterm — diagnosis terminology matcher
//!
//! Matches free-text diagnosis queries against a coded terminology dataset
//! (ICD-11 plus the NAMASTE Ayurveda, Siddha and Unani code sets) and hands
//! the chosen diagnosis, with every available code, to a consultation form.
//!
//! # Architecture
//!
//! ```text
//! DatasetStore ──► CsvSource ──┐
//!                              ├──► QueryPipeline ──► TUI autocomplete ──► ConsultationDraft
//! RemoteTerminology ───────────┘                                                 │
//!                                                    ConsultationClient ◄────────┘
//! ```
//!
//! The library crates are re-exported so integration harnesses can reach
//! everything through `dxterm::`.

pub mod headless;

pub use dxterm_core;
pub use dxterm_remote;
