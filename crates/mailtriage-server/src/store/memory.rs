// crates/mailtriage-server/src/store/memory.rs
// Process-local store; contents are lost on restart

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use mailtriage_types::{ClassificationRecord, EmailPayload, EmailStats, ProcessedEmail};
use tokio::sync::RwLock;
use tracing::debug;

use super::EmailStore;
use crate::{Result, TriageError};

#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<ProcessedEmail>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EmailStore for InMemoryStore {
    async fn append(
        &self,
        original: EmailPayload,
        analysis: ClassificationRecord,
    ) -> Result<ProcessedEmail> {
        // Id is assigned under the write lock so concurrent appends never collide
        let mut records = self.records.write().await;
        let id = u64::try_from(records.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| TriageError::Store("id space exhausted".into()))?;
        let processed = ProcessedEmail {
            id,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            original,
            analysis,
        };
        records.push(processed.clone());
        debug!(id = processed.id, total = records.len(), "Stored processed email");
        Ok(processed)
    }

    async fn list(&self) -> Result<Vec<ProcessedEmail>> {
        Ok(self.records.read().await.clone())
    }

    async fn stats(&self) -> Result<EmailStats> {
        let records = self.records.read().await;
        Ok(EmailStats::from_records(records.iter().map(|r| &r.analysis)))
    }
}
