//! dxterm-remote — HTTP collaborators for dxterm.
//!
//! Each adapter talks to the external backend (or a static asset host) and
//! plugs into a `dxterm-core` seam: [`RemoteTerminology`] is a
//! `SuggestionSource`, [`HttpDatasetSource`] is a `DatasetSource`, and
//! [`ConsultationClient`] submits the finished form.

pub mod consultation;
pub mod dataset;
pub mod error;
pub mod http;
pub mod sources;
pub mod terminology;

pub use consultation::ConsultationClient;
pub use dataset::HttpDatasetSource;
pub use error::{RemoteError, Result};
pub use http::HttpClient;
pub use sources::build_source;
pub use terminology::RemoteTerminology;
