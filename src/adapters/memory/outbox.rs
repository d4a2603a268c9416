//! In-memory transactional outbox.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, Timestamp};
use crate::ports::{OutboxEntry, OutboxStatus, OutboxWriter};

/// Failed entries are retried until they reach this many attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Outbox kept in a vector in write order.
pub struct InMemoryOutbox {
    entries: RwLock<Vec<OutboxEntry>>,
    max_attempts: u32,
    fail_writes: AtomicBool,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            max_attempts,
            fail_writes: AtomicBool::new(false),
        }
    }

    /// While set, writes fail with `DatabaseError` and queue nothing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every entry regardless of status, in write order.
    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.entries.read().await.clone()
    }

    pub async fn count_with_status(&self, status: OutboxStatus) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.status == status)
            .count()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Outbox is unavailable",
            ));
        }
        Ok(())
    }

    async fn update_entry(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut OutboxEntry),
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let entry = entries.iter_mut().find(|e| e.id == id).ok_or_else(|| {
            DomainError::new(ErrorCode::NotFound, format!("Outbox entry {} not found", id))
        })?;
        apply(entry);
        Ok(())
    }
}

impl Default for InMemoryOutbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboxWriter for InMemoryOutbox {
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError> {
        self.check_writable()?;
        let entry = OutboxEntry::new(event.clone(), partition_key);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn write_batch(
        &self,
        events: &[EventEnvelope],
        partition_key: &str,
    ) -> Result<Vec<OutboxEntry>, DomainError> {
        self.check_writable()?;
        let batch: Vec<OutboxEntry> = events
            .iter()
            .map(|e| OutboxEntry::new(e.clone(), partition_key))
            .collect();
        self.entries.write().await.extend(batch.iter().cloned());
        Ok(batch)
    }

    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.is_deliverable(self.max_attempts))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError> {
        self.update_entry(id, OutboxEntry::mark_published).await
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        self.update_entry(id, |entry| entry.mark_failed(error)).await
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError> {
        let cutoff = Timestamp::now().minus_hours(i64::from(older_than_hours));
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| {
            !(e.status == OutboxStatus::Published
                && e.processed_at.is_some_and(|at| at.is_before(&cutoff)))
        });
        Ok((before - entries.len()) as u64)
    }
}
