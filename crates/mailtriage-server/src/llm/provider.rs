// crates/mailtriage-server/src/llm/provider.rs
// Remote classifier abstraction and its failure taxonomy

use async_trait::async_trait;
use mailtriage_types::ProbeReport;
use thiserror::Error;

/// Why a remote classification attempt produced no usable text.
///
/// None of these reach an HTTP caller: the analyzer turns every one of them
/// into a fallback record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("no completion API credential configured")]
    NoCredentials,

    #[error("completion API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("completion API call timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),
}

impl ClassifierError {
    /// Stable snake_case name for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCredentials => "no_credentials",
            Self::HttpStatus { .. } => "http_error",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport_error",
            Self::MalformedEnvelope(_) => "malformed_envelope",
        }
    }
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Anything that can turn an email into raw classifier text
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// One bounded attempt. Returns the model's text content verbatim.
    async fn classify_raw(&self, subject: &str, body: &str) -> Result<String, ClassifierError>;

    /// Whether a credential is available (false means every call fails fast)
    fn is_configured(&self) -> bool;

    /// Raw connectivity check against the backing service
    async fn probe(&self) -> Result<ProbeReport, ClassifierError> {
        Err(ClassifierError::Transport("connectivity probe not supported".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ClassifierError::NoCredentials.kind(), "no_credentials");
        assert_eq!(
            ClassifierError::HttpStatus { status: 429, body: String::new() }.kind(),
            "http_error"
        );
        assert_eq!(ClassifierError::Timeout.kind(), "timeout");
        assert_eq!(ClassifierError::Transport("refused".into()).kind(), "transport_error");
        assert_eq!(ClassifierError::MalformedEnvelope("x".into()).kind(), "malformed_envelope");
    }

    #[test]
    fn test_error_display() {
        let err = ClassifierError::HttpStatus {
            status: 401,
            body: "invalid api key".into(),
        };
        assert_eq!(err.to_string(), "completion API returned HTTP 401: invalid api key");
        assert!(ClassifierError::Timeout.to_string().contains("timed out"));
    }
}
