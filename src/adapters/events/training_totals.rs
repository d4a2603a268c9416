//! TrainingTotalsProjection - per-member running totals fed by workout events.
//!
//! Counts completed exercises, weight moved and completed sessions. The
//! projection is not idempotent on its own; subscribe it through
//! `IdempotentHandler` so redelivered events are not counted twice.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, TypedEvent, UserId};
use crate::domain::workout::{ExerciseCompleted, WorkoutSessionCompleted};
use crate::ports::EventHandler;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrainingTotals {
    pub sessions_completed: u32,
    pub exercises_completed: u32,
    pub weight_moved: f64,
}

#[derive(Default)]
pub struct TrainingTotalsProjection {
    totals: RwLock<HashMap<UserId, TrainingTotals>>,
}

impl TrainingTotalsProjection {
    /// Event types this projection consumes.
    pub const EVENT_TYPES: [&'static str; 2] = [
        ExerciseCompleted::EVENT_TYPE,
        WorkoutSessionCompleted::EVENT_TYPE,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals_for(&self, user_id: &UserId) -> TrainingTotals {
        self.totals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    fn apply(&self, user_id: UserId, update: impl FnOnce(&mut TrainingTotals)) {
        let mut totals = self.totals.write().unwrap_or_else(PoisonError::into_inner);
        update(totals.entry(user_id).or_default());
    }
}

fn decode_error(envelope: &EventEnvelope, err: serde_json::Error) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Malformed {} payload: {}", envelope.event_type, err),
    )
    .with_detail("event_id", envelope.event_id.to_string())
}

#[async_trait]
impl EventHandler for TrainingTotalsProjection {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        match envelope.event_type.as_str() {
            ExerciseCompleted::EVENT_TYPE => {
                let event: ExerciseCompleted = envelope
                    .payload_as()
                    .map_err(|e| decode_error(&envelope, e))?;
                self.apply(event.user_id, |totals| {
                    totals.exercises_completed += 1;
                    totals.weight_moved += event.total_weight_moved;
                });
            }
            WorkoutSessionCompleted::EVENT_TYPE => {
                let event: WorkoutSessionCompleted = envelope
                    .payload_as()
                    .map_err(|e| decode_error(&envelope, e))?;
                tracing::info!(
                    session_id = %event.session_id,
                    user_id = %event.user_id,
                    duration_seconds = event.duration_seconds,
                    auto_completed = event.auto_completed,
                    "Member finished a workout"
                );
                self.apply(event.user_id, |totals| totals.sessions_completed += 1);
            }
            _ => {}
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TrainingTotalsProjection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::{IdempotentHandler, InMemoryEventBus};
    use crate::adapters::memory::InMemoryProcessedEventStore;
    use crate::domain::foundation::{
        EventId, ExerciseId, SerializableDomainEvent, Timestamp, WorkoutSessionId,
    };
    use crate::ports::{EventPublisher, EventSubscriber};
    use serde_json::json;
    use std::sync::Arc;

    fn member() -> UserId {
        UserId::new("member-1").unwrap()
    }

    fn exercise_completed(weight: f64) -> EventEnvelope {
        ExerciseCompleted {
            event_id: EventId::new(),
            session_id: WorkoutSessionId::new(),
            user_id: member(),
            exercise_id: ExerciseId::new(),
            order: 1,
            sets_completed: 3,
            total_reps: 30,
            total_weight_moved: weight,
            completed_exercises: 1,
            total_exercises: 1,
            completed_at: Timestamp::now(),
        }
        .to_envelope()
        .unwrap()
    }

    fn session_completed() -> EventEnvelope {
        WorkoutSessionCompleted {
            event_id: EventId::new(),
            session_id: WorkoutSessionId::new(),
            user_id: member(),
            duration_seconds: 1800,
            completed_exercises: 1,
            total_exercises: 1,
            auto_completed: true,
            completed_at: Timestamp::now(),
        }
        .to_envelope()
        .unwrap()
    }

    #[tokio::test]
    async fn accumulates_per_member() {
        let projection = TrainingTotalsProjection::new();

        projection.handle(exercise_completed(500.0)).await.unwrap();
        projection.handle(exercise_completed(250.0)).await.unwrap();
        projection.handle(session_completed()).await.unwrap();

        let totals = projection.totals_for(&member());
        assert_eq!(totals.exercises_completed, 2);
        assert_eq!(totals.weight_moved, 750.0);
        assert_eq!(totals.sessions_completed, 1);
        assert_eq!(
            projection.totals_for(&UserId::new("member-2").unwrap()),
            TrainingTotals::default()
        );
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let projection = TrainingTotalsProjection::new();
        let envelope = EventEnvelope::new(
            ExerciseCompleted::EVENT_TYPE,
            "session-1",
            "WorkoutSession",
            json!({ "unexpected": true }),
        );

        let err = projection.handle(envelope).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn redelivery_through_the_bus_counts_once() {
        let projection = Arc::new(TrainingTotalsProjection::new());
        let bus = InMemoryEventBus::new();
        let handler = IdempotentHandler::new(
            SharedProjection(projection.clone()),
            Arc::new(InMemoryProcessedEventStore::new()),
        );
        bus.subscribe_all(&TrainingTotalsProjection::EVENT_TYPES, Arc::new(handler));

        let event = exercise_completed(100.0);
        bus.publish(event.clone()).await.unwrap();
        bus.publish(event).await.unwrap();

        assert_eq!(projection.totals_for(&member()).exercises_completed, 1);
    }

    struct SharedProjection(Arc<TrainingTotalsProjection>);

    #[async_trait]
    impl EventHandler for SharedProjection {
        async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
            self.0.handle(envelope).await
        }

        fn name(&self) -> &'static str {
            self.0.name()
        }
    }
}
