// crates/mailtriage-server/src/llm/http_client.rs
// Single-attempt HTTP executor for the completion API

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use super::ClassifierError;
use crate::http::create_shared_client;

/// Longest error body kept in `ClassifierError::HttpStatus`
const MAX_ERROR_BODY_CHARS: usize = 500;

/// HTTP client wrapper used by the completion client.
///
/// Exactly one attempt per call. The timeout is set on the client and again
/// on every request so a caller-supplied client cannot lift the bound.
pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            client: create_shared_client(request_timeout),
            request_timeout,
        }
    }

    /// POST a JSON body with Bearer auth; returns status code and body text
    pub async fn send(
        &self,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<(u16, String), ClassifierError> {
        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// POST and require a 2xx status; returns the response body as text
    pub async fn execute(
        &self,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String, ClassifierError> {
        let (status, text) = self.send(url, api_key, body).await.inspect_err(|e| {
            warn!(request_id = %request_id, kind = e.kind(), error = %e, "Completion request failed");
        })?;

        if !(200..300).contains(&status) {
            warn!(
                request_id = %request_id,
                status = status,
                error = %text,
                "Completion API returned an error status"
            );
            return Err(ClassifierError::HttpStatus {
                status,
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(text)
    }
}
