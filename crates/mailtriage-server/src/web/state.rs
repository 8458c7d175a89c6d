// crates/mailtriage-server/src/web/state.rs
// Web server state management

use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::EnvConfig;
use crate::llm::{CompletionClient, RemoteClassifier};
use crate::store::{EmailStore, InMemoryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Stateless analysis pipeline
    pub analyzer: Analyzer,

    /// Processed email store (in-memory by default)
    pub store: Arc<dyn EmailStore>,

    /// Dashboard HTML override; the built-in page is served when unset or unreadable
    pub dashboard_path: Option<PathBuf>,

    /// Base URL advertised on the landing document
    pub public_url: String,
}

impl AppState {
    /// Create state from explicit collaborators
    pub fn new(classifier: Arc<dyn RemoteClassifier>, store: Arc<dyn EmailStore>) -> Self {
        Self {
            analyzer: Analyzer::new(classifier),
            store,
            dashboard_path: None,
            public_url: "http://localhost:5000".to_string(),
        }
    }

    /// Production wiring: completion client + in-memory store
    pub fn from_config(config: &EnvConfig) -> Self {
        let classifier = Arc::new(CompletionClient::from_config(config));
        let mut state = Self::new(classifier, Arc::new(InMemoryStore::new()));
        state.dashboard_path = config.dashboard_path.clone();
        state.public_url = format!("http://localhost:{}", config.port);
        state
    }

    pub fn with_dashboard_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dashboard_path = Some(path.into());
        self
    }

    pub fn classifier(&self) -> &Arc<dyn RemoteClassifier> {
        self.analyzer.classifier()
    }
}
