// crates/mailtriage-server/src/store/mod.rs
// Processed email storage, injected into the web layer

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use mailtriage_types::{ClassificationRecord, EmailPayload, EmailStats, ProcessedEmail};

use crate::Result;

/// Append-only record store. Implementations assign ids and timestamps.
#[async_trait]
pub trait EmailStore: Send + Sync {
    /// Store an analyzed email and return the stored record
    async fn append(
        &self,
        original: EmailPayload,
        analysis: ClassificationRecord,
    ) -> Result<ProcessedEmail>;

    /// All records in insertion order
    async fn list(&self) -> Result<Vec<ProcessedEmail>>;

    /// Aggregate counts over all records
    async fn stats(&self) -> Result<EmailStats>;
}
