// crates/mailtriage-server/src/llm/response.rs
// OpenAI-compatible chat response parsing

use serde::Deserialize;

use super::ClassifierError;

/// Non-streaming chat response. Every level is optional so a wrong shape
/// surfaces as `MalformedEnvelope` instead of a serde error.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<ResponseChoice>>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Extract the first choice's text content from a raw response body
pub fn parse_chat_response(response_body: &str) -> Result<(String, Option<Usage>), ClassifierError> {
    let data: ChatResponse = serde_json::from_str(response_body)
        .map_err(|e| ClassifierError::MalformedEnvelope(format!("unparsable response body: {}", e)))?;

    let choices = data
        .choices
        .ok_or_else(|| ClassifierError::MalformedEnvelope("missing choices array".into()))?;

    let content = choices
        .into_iter()
        .next()
        .ok_or_else(|| ClassifierError::MalformedEnvelope("empty choices array".into()))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| ClassifierError::MalformedEnvelope("first choice has no message content".into()))?;

    Ok((content, data.usage))
}
