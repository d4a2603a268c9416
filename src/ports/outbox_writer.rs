//! OutboxWriter port - durable queue of committed events awaiting delivery.
//!
//! The unit of work writes the envelopes of a session's staged events here
//! right after the session is saved; `OutboxPublisher` later drains pending
//! entries to the `EventPublisher`. Events are therefore never published for
//! a save that did not commit, and a crash between commit and publish only
//! delays delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope, Timestamp};

/// Delivery state of an outbox entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Written, not yet published.
    Pending,
    /// Published; kept until the retention window passes.
    Published,
    /// Last publish attempt failed; eligible for retry.
    Failed,
}

/// One queued event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: Uuid,
    pub event: EventEnvelope,
    pub status: OutboxStatus,
    pub created_at: Timestamp,
    /// When the entry was last published or failed.
    pub processed_at: Option<Timestamp>,
    pub attempts: u32,
    pub last_error: Option<String>,
    /// Member id of the session owner; entries of one member keep their order.
    pub partition_key: String,
}

impl OutboxEntry {
    pub fn new(event: EventEnvelope, partition_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            status: OutboxStatus::Pending,
            created_at: Timestamp::now(),
            processed_at: None,
            attempts: 0,
            last_error: None,
            partition_key: partition_key.into(),
        }
    }

    pub fn mark_published(&mut self) {
        self.status = OutboxStatus::Published;
        self.processed_at = Some(Timestamp::now());
        self.attempts += 1;
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = OutboxStatus::Failed;
        self.processed_at = Some(Timestamp::now());
        self.attempts += 1;
        self.last_error = Some(error.into());
    }

    /// Pending, or failed with attempts left.
    pub fn is_deliverable(&self, max_attempts: u32) -> bool {
        match self.status {
            OutboxStatus::Pending => true,
            OutboxStatus::Failed => self.attempts < max_attempts,
            OutboxStatus::Published => false,
        }
    }
}

/// Port for the transactional outbox.
///
/// ```ignore
/// repository.save(&session).await?;
/// let envelopes = session.uncommitted_events().iter().map(|e| e.to_envelope()).collect::<Result<Vec<_>, _>>()?;
/// outbox.write_batch(&envelopes, session.user_id().as_str()).await?;
/// ```
#[async_trait]
pub trait OutboxWriter: Send + Sync {
    /// Queue a single event.
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError>;

    /// Queue several events at once, preserving their order.
    async fn write_batch(
        &self,
        events: &[EventEnvelope],
        partition_key: &str,
    ) -> Result<Vec<OutboxEntry>, DomainError>;

    /// Deliverable entries, oldest first, at most `limit`.
    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError>;

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError>;

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;

    /// Deletes published entries processed more than `older_than_hours` ago.
    /// Returns how many were removed.
    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError>;
}
