//! ProcessedEventStore port - remembers which handler already saw which event.
//!
//! Outbox delivery is at-least-once, so an event can reach a handler again
//! after a publisher restart or a failed acknowledgment. `IdempotentHandler`
//! consults this store to skip the repeat.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, Timestamp};

/// Processing records keyed by (event id, handler name).
///
/// Handlers are tracked independently: one handler having processed an event
/// says nothing about another.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    async fn contains(&self, event_id: &EventId, handler_name: &str) -> Result<bool, DomainError>;

    /// Records a successful handling. Marking twice is harmless.
    async fn mark_processed(&self, event_id: &EventId, handler_name: &str)
        -> Result<(), DomainError>;

    /// Drops records older than `timestamp`, returning how many were removed.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}
