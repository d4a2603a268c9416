//! IdempotentHandler - skips events the wrapped handler already processed.
//!
//! ```ignore
//! let streaks = IdempotentHandler::new(StreakUpdater::new(repo), processed_events.clone());
//! bus.subscribe(WorkoutSessionCompleted::EVENT_TYPE, Arc::new(streaks));
//! ```
//!
//! The event is recorded only after the inner handler succeeds, so a failure
//! leaves it eligible for the next delivery. Store errors propagate.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, ProcessedEventStore};

/// Decorates an `EventHandler` with processed-event tracking keyed by the
/// inner handler's `name()`.
///
/// Check-then-handle is not atomic: two concurrent deliveries of the same
/// event can both reach the inner handler. Redelivery after a completed
/// handling is always skipped.
pub struct IdempotentHandler<H: EventHandler> {
    inner: H,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl<H: EventHandler> IdempotentHandler<H> {
    pub fn new(inner: H, processed_events: Arc<dyn ProcessedEventStore>) -> Self {
        Self {
            inner,
            processed_events,
        }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H: EventHandler + 'static> EventHandler for IdempotentHandler<H> {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let handler_name = self.inner.name();

        if self
            .processed_events
            .contains(&envelope.event_id, handler_name)
            .await?
        {
            tracing::debug!(
                event_id = %envelope.event_id,
                handler = handler_name,
                "Skipping already processed event"
            );
            return Ok(());
        }

        let event_id = envelope.event_id.clone();
        self.inner.handle(envelope).await?;

        self.processed_events
            .mark_processed(&event_id, handler_name)
            .await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryProcessedEventStore;
    use crate::domain::foundation::{ErrorCode, EventId};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        name: &'static str,
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl Counting {
        fn named(name: &'static str) -> Self {
            Self {
                name,
                calls: AtomicUsize::new(0),
                fail_first: 0,
            }
        }

        fn failing_first(fail_first: usize) -> Self {
            Self {
                fail_first,
                ..Self::named("Flaky")
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventHandler for Counting {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(DomainError::new(ErrorCode::InternalError, "transient"));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn envelope(id: &str) -> EventEnvelope {
        let mut envelope = EventEnvelope::new(
            "workout_session.completed.v1",
            "session-1",
            "WorkoutSession",
            json!({}),
        );
        envelope.event_id = EventId::from_string(id);
        envelope
    }

    fn store() -> Arc<InMemoryProcessedEventStore> {
        Arc::new(InMemoryProcessedEventStore::new())
    }

    #[tokio::test]
    async fn redelivery_is_skipped() {
        let handler = IdempotentHandler::new(Counting::named("Streaks"), store());

        handler.handle(envelope("evt-1")).await.unwrap();
        handler.handle(envelope("evt-1")).await.unwrap();
        handler.handle(envelope("evt-2")).await.unwrap();

        assert_eq!(handler.inner().calls(), 2);
        assert_eq!(handler.name(), "Streaks");
    }

    #[tokio::test]
    async fn failure_is_not_recorded_and_can_be_retried() {
        let processed = store();
        let handler = IdempotentHandler::new(Counting::failing_first(2), processed.clone());

        assert!(handler.handle(envelope("evt-1")).await.is_err());
        assert!(!processed
            .contains(&EventId::from_string("evt-1"), "Flaky")
            .await
            .unwrap());

        assert!(handler.handle(envelope("evt-1")).await.is_err());
        handler.handle(envelope("evt-1")).await.unwrap();
        handler.handle(envelope("evt-1")).await.unwrap();

        assert_eq!(handler.inner().calls(), 3);
    }

    #[tokio::test]
    async fn each_handler_processes_the_event_once() {
        let processed = store();
        let streaks = IdempotentHandler::new(Counting::named("Streaks"), processed.clone());
        let leaderboard = IdempotentHandler::new(Counting::named("Leaderboard"), processed);

        for _ in 0..2 {
            streaks.handle(envelope("shared")).await.unwrap();
            leaderboard.handle(envelope("shared")).await.unwrap();
        }

        assert_eq!(streaks.inner().calls(), 1);
        assert_eq!(leaderboard.inner().calls(), 1);
    }
}
