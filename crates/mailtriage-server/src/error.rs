// crates/mailtriage-server/src/error.rs
// Error types for the service edges (startup config, record store)

use thiserror::Error;

/// Main error type for the mailtriage library.
///
/// The analysis pipeline itself never returns this: classifier and parse
/// failures are absorbed into fallback records.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),
}

/// Convenience type alias for Result using TriageError
pub type Result<T> = std::result::Result<T, TriageError>;
