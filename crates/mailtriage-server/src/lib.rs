// crates/mailtriage-server/src/lib.rs
// mailtriage - support email triage service

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod analysis;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod store;
pub mod web;
pub use error::{Result, TriageError};
