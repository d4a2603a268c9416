//! WorkoutUnitOfWork - persists a session and flushes its staged events.
//!
//! Every command handler ends with `commit`:
//!
//! 1. Build envelopes from the staged events (nothing is written if one
//!    fails to serialize)
//! 2. `save` a new session or `update` a loaded one
//! 3. Hand the envelopes to the outbox, or publish them directly
//! 4. Mark the session persisted and clear its event buffer
//!
//! A failed persist returns the error with the buffer untouched and nothing
//! published; the caller drops the instance and reloads. A relational
//! adapter writes the session row and outbox rows in one transaction. The
//! in-memory adapters cannot, so an outbox failure after a successful save
//! is returned as an error with the session state already stored.

use std::sync::Arc;

use crate::config::FeatureFlags;
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, EventEnvelope, SerializableDomainEvent, WorkoutSessionId,
};
use crate::domain::workout::WorkoutSession;
use crate::ports::{EventPublisher, OutboxWriter, WorkoutSessionRepository};

use super::WorkoutCommandError;

/// Where committed events go.
#[derive(Clone)]
pub enum EventDelivery {
    /// Queue in the outbox; `OutboxPublisher` delivers later.
    Outbox(Arc<dyn OutboxWriter>),
    /// Publish right after the commit. Failures are logged, not returned.
    Direct(Arc<dyn EventPublisher>),
}

pub struct WorkoutUnitOfWork {
    repository: Arc<dyn WorkoutSessionRepository>,
    delivery: EventDelivery,
}

impl WorkoutUnitOfWork {
    pub fn new(repository: Arc<dyn WorkoutSessionRepository>, delivery: EventDelivery) -> Self {
        Self {
            repository,
            delivery,
        }
    }

    pub fn with_outbox(
        repository: Arc<dyn WorkoutSessionRepository>,
        outbox: Arc<dyn OutboxWriter>,
    ) -> Self {
        Self::new(repository, EventDelivery::Outbox(outbox))
    }

    pub fn with_publisher(
        repository: Arc<dyn WorkoutSessionRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::new(repository, EventDelivery::Direct(publisher))
    }

    /// Picks the delivery mode from `features.publish_via_outbox`.
    pub fn from_features(
        repository: Arc<dyn WorkoutSessionRepository>,
        outbox: Arc<dyn OutboxWriter>,
        publisher: Arc<dyn EventPublisher>,
        features: &FeatureFlags,
    ) -> Self {
        if features.publish_via_outbox {
            Self::with_outbox(repository, outbox)
        } else {
            Self::with_publisher(repository, publisher)
        }
    }

    pub fn repository(&self) -> &Arc<dyn WorkoutSessionRepository> {
        &self.repository
    }

    pub fn uses_outbox(&self) -> bool {
        matches!(self.delivery, EventDelivery::Outbox(_))
    }

    /// Loads a session for mutation.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no session has this id
    /// - `Infrastructure` on repository failure
    pub async fn load(&self, id: WorkoutSessionId) -> Result<WorkoutSession, WorkoutCommandError> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(WorkoutCommandError::SessionNotFound(id))
    }

    /// Persists `session` and flushes its staged events.
    ///
    /// Returns the number of events handed on.
    pub async fn commit(
        &self,
        session: &mut WorkoutSession,
        metadata: &CommandMetadata,
    ) -> Result<usize, WorkoutCommandError> {
        let session_id = session.id();
        let envelopes = self.envelopes(session, metadata)?;

        let persisted = if session.is_persisted() {
            self.repository.update(session).await
        } else {
            self.repository.save(session).await
        };
        if let Err(e) = persisted {
            tracing::warn!(
                session_id = %session_id,
                error = %e,
                "Workout session commit failed; staged events kept"
            );
            return Err(e.into());
        }

        let count = envelopes.len();
        if count > 0 {
            self.deliver(session_id, session.user_id().as_str(), envelopes)
                .await?;
        }

        session.mark_persisted();
        session.clear_domain_events();

        tracing::debug!(
            session_id = %session_id,
            status = %session.status(),
            events = count,
            "Committed workout session"
        );
        Ok(count)
    }

    fn envelopes(
        &self,
        session: &WorkoutSession,
        metadata: &CommandMetadata,
    ) -> Result<Vec<EventEnvelope>, WorkoutCommandError> {
        let correlation_id = metadata.correlation_id();
        session
            .uncommitted_events()
            .iter()
            .map(|event| -> Result<EventEnvelope, WorkoutCommandError> {
                let mut envelope = event
                    .to_envelope()?
                    .with_correlation_id(correlation_id.as_str())
                    .with_user_id(metadata.user_id.as_str());
                if let Some(trace_id) = metadata.trace_id() {
                    envelope = envelope.with_trace_id(trace_id);
                }
                Ok(envelope)
            })
            .collect()
    }

    async fn deliver(
        &self,
        session_id: WorkoutSessionId,
        partition_key: &str,
        envelopes: Vec<EventEnvelope>,
    ) -> Result<(), WorkoutCommandError> {
        match &self.delivery {
            EventDelivery::Outbox(outbox) => {
                outbox.write_batch(&envelopes, partition_key).await?;
            }
            EventDelivery::Direct(publisher) => {
                let count = envelopes.len();
                if let Err(e) = publisher.publish_all(envelopes).await {
                    tracing::error!(
                        session_id = %session_id,
                        events = count,
                        error = %e,
                        "Publishing committed events failed"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryOutbox, InMemoryWorkoutSessionRepository};
    use crate::adapters::InMemoryEventBus;
    use crate::domain::foundation::{
        DomainError, ErrorCode, ExerciseId, TypedEvent, UserId,
    };
    use crate::domain::workout::{
        NewWorkoutSession, PlannedExercise, WorkoutSessionCreated, WorkoutSessionStarted,
    };
    use crate::ports::OutboxStatus;

    struct Unreachable;

    #[async_trait::async_trait]
    impl EventPublisher for Unreachable {
        async fn publish(&self, _: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::PublishFailed, "broker unreachable"))
        }

        async fn publish_all(&self, _: Vec<EventEnvelope>) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::PublishFailed, "broker unreachable"))
        }
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(UserId::new("member-1").unwrap())
            .with_correlation_id("req-42")
            .with_trace_id("trace-7")
    }

    fn new_session() -> WorkoutSession {
        let new = NewWorkoutSession::new(UserId::new("member-1").unwrap(), "Leg day")
            .with_exercise(PlannedExercise::new(ExerciseId::new(), 1));
        WorkoutSession::create(WorkoutSessionId::new(), new).unwrap()
    }

    #[tokio::test]
    async fn direct_commit_saves_then_publishes_and_clears() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = WorkoutUnitOfWork::with_publisher(repo.clone(), bus.clone());
        let mut session = new_session();

        let count = uow.commit(&mut session, &metadata()).await.unwrap();

        assert_eq!(count, 1);
        assert!(repo.exists(&session.id()).await.unwrap());
        assert!(session.uncommitted_events().is_empty());
        assert!(session.is_persisted());
        assert!(bus.has_event(WorkoutSessionCreated::EVENT_TYPE));
    }

    #[tokio::test]
    async fn envelopes_carry_request_metadata() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = WorkoutUnitOfWork::with_publisher(repo, bus.clone());
        let mut session = new_session();

        uow.commit(&mut session, &metadata()).await.unwrap();

        let envelope = &bus.published_events()[0];
        assert_eq!(envelope.aggregate_id, session.id().to_string());
        assert_eq!(envelope.metadata.correlation_id.as_deref(), Some("req-42"));
        assert_eq!(envelope.metadata.user_id.as_deref(), Some("member-1"));
        assert_eq!(envelope.metadata.trace_id.as_deref(), Some("trace-7"));
    }

    #[tokio::test]
    async fn second_commit_updates_and_sends_only_new_events() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = WorkoutUnitOfWork::with_publisher(repo.clone(), bus.clone());
        let mut session = new_session();
        uow.commit(&mut session, &metadata()).await.unwrap();

        session.start_session().unwrap();
        uow.commit(&mut session, &metadata()).await.unwrap();

        let types: Vec<_> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            types,
            vec![WorkoutSessionCreated::EVENT_TYPE, WorkoutSessionStarted::EVENT_TYPE]
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn failed_save_publishes_nothing_and_keeps_the_buffer() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        repo.set_fail_writes(true);
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = WorkoutUnitOfWork::with_publisher(repo.clone(), bus.clone());
        let mut session = new_session();

        let err = uow.commit(&mut session, &metadata()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(bus.event_count(), 0);
        assert_eq!(session.uncommitted_events().len(), 1);
        assert!(!session.is_persisted());
    }

    #[tokio::test]
    async fn outbox_commit_queues_events_by_member() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let outbox = Arc::new(InMemoryOutbox::new());
        let uow = WorkoutUnitOfWork::with_outbox(repo, outbox.clone());
        let mut session = new_session();

        uow.commit(&mut session, &metadata()).await.unwrap();

        let entries = outbox.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].partition_key, "member-1");
        assert_eq!(entries[0].status, OutboxStatus::Pending);
        assert!(session.uncommitted_events().is_empty());
    }

    #[tokio::test]
    async fn direct_publish_failure_does_not_fail_the_commit() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let uow = WorkoutUnitOfWork::with_publisher(repo.clone(), Arc::new(Unreachable));
        let mut session = new_session();

        uow.commit(&mut session, &metadata()).await.unwrap();

        assert!(repo.exists(&session.id()).await.unwrap());
        assert!(session.uncommitted_events().is_empty());
    }

    #[tokio::test]
    async fn load_reports_missing_session() {
        let uow = WorkoutUnitOfWork::with_publisher(
            Arc::new(InMemoryWorkoutSessionRepository::new()),
            Arc::new(InMemoryEventBus::new()),
        );
        let id = WorkoutSessionId::new();

        let err = uow.load(id).await.unwrap_err();

        assert!(matches!(err, WorkoutCommandError::SessionNotFound(missing) if missing == id));
    }

    #[test]
    fn feature_flag_selects_delivery() {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let outbox = Arc::new(InMemoryOutbox::new());
        let bus = Arc::new(InMemoryEventBus::new());

        let queued = WorkoutUnitOfWork::from_features(
            repo.clone(),
            outbox.clone(),
            bus.clone(),
            &FeatureFlags::default(),
        );
        let direct = WorkoutUnitOfWork::from_features(
            repo,
            outbox,
            bus,
            &FeatureFlags {
                publish_via_outbox: false,
            },
        );

        assert!(queued.uses_outbox());
        assert!(!direct.uses_outbox());
    }
}
