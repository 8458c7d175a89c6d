// crates/mailtriage-server/src/llm/mod.rs
// Remote classifier adapter (OpenAI-compatible chat completions)

mod client;
mod http_client;
mod prompt;
mod provider;
mod request;
mod response;

pub use client::CompletionClient;
pub use http_client::LlmHttpClient;
pub use prompt::{CLASSIFY_MAX_TOKENS, CLASSIFY_TEMPERATURE, classification_messages};
pub use provider::{ClassifierError, RemoteClassifier};
pub use request::{ChatRequest, Message};
pub use response::{ChatResponse, Usage, parse_chat_response};
