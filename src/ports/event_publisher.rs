//! EventPublisher port - hands committed domain events to the transport.
//!
//! The unit of work calls this only after the session state is durable.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-least-once: handlers must tolerate duplicates (see
/// `IdempotentHandler`). Errors propagate to the caller, which decides
/// whether to retry.
///
/// ```ignore
/// let envelope = event.to_envelope()?.with_correlation_id(metadata.correlation_id());
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish a batch in order.
    ///
    /// Adapters without atomic batches publish sequentially and stop at the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
