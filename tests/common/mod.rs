//! Shared test utilities for dxterm integration harnesses.
//!
//! Import everything via `mod common; use common::*;` at the top of each
//! harness file. Debounce tests run with paused tokio time; anything that
//! talks to [`fake_terminology_api`] runs in real time.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fake_terminology_api;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
