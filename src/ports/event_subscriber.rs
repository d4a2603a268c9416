//! EventSubscriber port - registers handlers for published events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Reacts to a published domain event.
///
/// Handlers run after the originating session was committed and may see the
/// same event more than once, so they must be idempotent. A failing handler
/// does not stop the others.
///
/// ```ignore
/// struct PersonalRecordTracker { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for PersonalRecordTracker {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let completed: ExerciseCompleted = event.payload_as()?;
///         // compare against the member's best lift...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "PersonalRecordTracker"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Stable name, used in logs and as the idempotency key namespace.
    fn name(&self) -> &'static str;
}

/// Registers handlers by event type.
///
/// ```ignore
/// subscriber.subscribe(WorkoutSessionCompleted::EVENT_TYPE, streak_updater);
/// subscriber.subscribe_all(&[ExerciseCompleted::EVENT_TYPE, WorkoutSessionCompleted::EVENT_TYPE], stats);
/// ```
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Publisher and subscriber in one, as the in-memory bus provides.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
