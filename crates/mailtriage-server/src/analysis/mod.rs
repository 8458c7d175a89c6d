// crates/mailtriage-server/src/analysis/mod.rs
// Analysis pipeline: remote classifier -> fence strip -> parse -> validate/backfill,
// with the keyword fallback on every failure path

mod fallback;
mod fences;
mod normalize;

pub use fallback::fallback;
pub use fences::strip_code_fences;
pub use normalize::{Normalized, normalize_response};

use mailtriage_types::ClassificationRecord;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{ClassifierError, RemoteClassifier};

/// Reasons a model result was discarded in favor of the fallback record
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model output is JSON but not an object")]
    NotAnObject,
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Classifier(e) => e.kind(),
            Self::Parse(_) | Self::NotAnObject => "parse_error",
        }
    }
}

/// Turns `(subject, body)` into a schema-valid record. Holds no mutable state.
#[derive(Clone)]
pub struct Analyzer {
    classifier: Arc<dyn RemoteClassifier>,
}

impl Analyzer {
    pub fn new(classifier: Arc<dyn RemoteClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Arc<dyn RemoteClassifier> {
        &self.classifier
    }

    /// Classify one email. Never fails: any classifier or parse problem yields
    /// the keyword fallback (tagged `mock_mode`).
    pub async fn analyze(&self, subject: &str, body: &str) -> ClassificationRecord {
        match self.analyze_with_model(subject, body).await {
            Ok(normalized) => {
                if !normalized.backfilled.is_empty() {
                    warn!(
                        kind = "missing_fields",
                        fields = ?normalized.backfilled,
                        "Model response incomplete, backfilled from keyword fallback"
                    );
                }
                normalized.record
            }
            Err(AnalysisError::Classifier(ClassifierError::NoCredentials)) => {
                debug!("No classifier credential, using keyword fallback");
                fallback(subject, body)
            }
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Model analysis failed, using keyword fallback");
                fallback(subject, body)
            }
        }
    }

    /// Model path only; surfaces why a result would fall back
    pub async fn analyze_with_model(
        &self,
        subject: &str,
        body: &str,
    ) -> Result<Normalized, AnalysisError> {
        let raw = self.classifier.classify_raw(subject, body).await?;
        normalize_response(&raw, subject, body)
    }
}
