// crates/mailtriage-server/src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{ApiKeys, ConfigValidation, EnvConfig, LlmConfig};
