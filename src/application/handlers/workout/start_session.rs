//! StartWorkoutSessionHandler - NotStarted → InProgress.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, Timestamp, WorkoutSessionId};

#[derive(Debug, Clone)]
pub struct StartWorkoutSessionCommand {
    pub session_id: WorkoutSessionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartWorkoutSessionResult {
    pub started_at: Timestamp,
}

pub struct StartWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl StartWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: StartWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<StartWorkoutSessionResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.start_session()?;
        self.uow.commit(&mut session, &metadata).await?;

        let started_at = session.start_time().unwrap_or_else(|| session.updated_at());
        tracing::info!(session_id = %cmd.session_id, "Workout session started");
        Ok(StartWorkoutSessionResult { started_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, ExerciseId, TypedEvent};
    use crate::domain::workout::{WorkoutSessionStarted, WorkoutSessionStatus};

    #[tokio::test]
    async fn starts_session_and_records_start_time() {
        let h = Harness::new();
        let id = h.seed(&[ExerciseId::new()]).await;
        let handler = StartWorkoutSessionHandler::new(h.uow.clone());

        let result = handler
            .handle(StartWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap();

        let session = h.load(id).await;
        assert_eq!(session.status(), WorkoutSessionStatus::InProgress);
        assert_eq!(session.start_time(), Some(result.started_at));
        assert_eq!(h.bus.events_of_type(WorkoutSessionStarted::EVENT_TYPE).len(), 1);
    }

    #[tokio::test]
    async fn starting_twice_is_state_conflict() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let handler = StartWorkoutSessionHandler::new(h.uow.clone());

        let err = handler
            .handle(StartWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        assert_eq!(h.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn paused_session_must_be_resumed_not_restarted() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let mut session = h.load(id).await;
        session.pause_session().unwrap();
        h.uow.commit(&mut session, &Harness::metadata()).await.unwrap();
        let started_at = h.load(id).await.start_time();

        let err = StartWorkoutSessionHandler::new(h.uow.clone())
            .handle(StartWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        let session = h.load(id).await;
        assert_eq!(session.status(), WorkoutSessionStatus::Paused);
        assert_eq!(session.start_time(), started_at);
        assert_eq!(h.bus.events_of_type(WorkoutSessionStarted::EVENT_TYPE).len(), 0);
    }

    #[tokio::test]
    async fn empty_session_cannot_start() {
        let h = Harness::new();
        let id = h.seed(&[]).await;

        let err = StartWorkoutSessionHandler::new(h.uow.clone())
            .handle(StartWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::StateConflict);
        assert_eq!(h.load(id).await.status(), WorkoutSessionStatus::NotStarted);
    }
}
