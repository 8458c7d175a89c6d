// crates/mailtriage-server/src/llm/client.rs
// Completion API client (Groq by default, any OpenAI-compatible endpoint works)

use async_trait::async_trait;
use mailtriage_types::ProbeReport;
use std::time::Instant;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

use super::http_client::LlmHttpClient;
use super::prompt::{self, CLASSIFY_MAX_TOKENS, CLASSIFY_TEMPERATURE};
use super::request::ChatRequest;
use super::response::parse_chat_response;
use super::{ClassifierError, RemoteClassifier};
use crate::config::{EnvConfig, LlmConfig};

const PROBE_TEMPERATURE: f32 = 0.1;
const PROBE_MAX_TOKENS: u32 = 50;

/// Remote classifier backed by a chat completions endpoint
pub struct CompletionClient {
    api_key: Option<String>,
    model: String,
    url: String,
    http: LlmHttpClient,
}

impl CompletionClient {
    /// Create a client; `api_key = None` yields a client that always reports `NoCredentials`
    pub fn new(api_key: Option<String>, llm: &LlmConfig) -> Self {
        Self {
            api_key,
            model: llm.model.clone(),
            url: llm.completions_url(),
            http: LlmHttpClient::new(llm.timeout),
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_keys.groq.clone(), &config.llm)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn api_key(&self) -> Result<&str, ClassifierError> {
        self.api_key.as_deref().ok_or(ClassifierError::NoCredentials)
    }

    /// Classify one email (single bounded attempt)
    #[instrument(skip(self, subject, body), fields(request_id, model = %self.model))]
    pub async fn classify(&self, subject: &str, body: &str) -> Result<String, ClassifierError> {
        let api_key = self.api_key()?;
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        let request = ChatRequest::new(&self.model, prompt::classification_messages(subject, body))
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_max_tokens(CLASSIFY_MAX_TOKENS);

        let payload = serde_json::to_string(&request)
            .map_err(|e| ClassifierError::Transport(format!("failed to encode request: {}", e)))?;
        debug!(request_id = %request_id, bytes = payload.len(), "Sending classification request");

        let response_body = self
            .http
            .execute(&request_id, &self.url, api_key, payload)
            .await?;

        let (content, usage) = parse_chat_response(&response_body)?;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        if let Some(u) = usage {
            info!(
                request_id = %request_id,
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "Classification usage stats"
            );
        }
        info!(
            request_id = %request_id,
            duration_ms = duration_ms,
            content_len = content.len(),
            "Classification complete"
        );

        Ok(content)
    }

    /// Raw connectivity check: reports status code and body without interpreting it
    pub async fn probe(&self) -> Result<ProbeReport, ClassifierError> {
        let api_key = self.api_key()?;
        let request = ChatRequest::new(&self.model, prompt::probe_messages())
            .with_temperature(PROBE_TEMPERATURE)
            .with_max_tokens(PROBE_MAX_TOKENS);
        let payload = serde_json::to_string(&request)
            .map_err(|e| ClassifierError::Transport(format!("failed to encode request: {}", e)))?;

        let (status_code, text) = self.http.send(&self.url, api_key, payload).await?;
        info!(status = status_code, "Completion API probe finished");

        let response = if status_code == 200 {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        } else {
            serde_json::Value::String(text)
        };

        Ok(ProbeReport {
            status_code,
            response,
        })
    }
}

#[async_trait]
impl RemoteClassifier for CompletionClient {
    async fn classify_raw(&self, subject: &str, body: &str) -> Result<String, ClassifierError> {
        self.classify(subject, body).await
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn probe(&self) -> Result<ProbeReport, ClassifierError> {
        CompletionClient::probe(self).await
    }
}
