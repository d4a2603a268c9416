//! Pause and resume handlers. Neither emits an event.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, WorkoutSessionId};
use crate::domain::workout::WorkoutSessionStatus;

#[derive(Debug, Clone)]
pub struct PauseWorkoutSessionCommand {
    pub session_id: WorkoutSessionId,
}

#[derive(Debug, Clone)]
pub struct ResumeWorkoutSessionCommand {
    pub session_id: WorkoutSessionId,
}

/// Status after a pause or resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatusResult {
    pub status: WorkoutSessionStatus,
}

/// InProgress → Paused.
pub struct PauseWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl PauseWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: PauseWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<SessionStatusResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.pause_session()?;
        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(session_id = %cmd.session_id, "Workout session paused");
        Ok(SessionStatusResult {
            status: session.status(),
        })
    }
}

/// Paused → InProgress.
pub struct ResumeWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl ResumeWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: ResumeWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<SessionStatusResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.resume_session()?;
        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(session_id = %cmd.session_id, "Workout session resumed");
        Ok(SessionStatusResult {
            status: session.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::ExerciseId;

    #[tokio::test]
    async fn pause_then_resume_round_trips_without_events() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let pause = PauseWorkoutSessionHandler::new(h.uow.clone());
        let resume = ResumeWorkoutSessionHandler::new(h.uow.clone());

        let paused = pause
            .handle(PauseWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap();
        assert_eq!(paused.status, WorkoutSessionStatus::Paused);
        assert_eq!(h.load(id).await.status(), WorkoutSessionStatus::Paused);

        let resumed = resume
            .handle(ResumeWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap();
        assert_eq!(resumed.status, WorkoutSessionStatus::InProgress);
        assert_eq!(h.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn pause_before_start_is_state_conflict() {
        let h = Harness::new();
        let id = h.seed(&[]).await;
        let pause = PauseWorkoutSessionHandler::new(h.uow.clone());

        let err = pause
            .handle(PauseWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        assert_eq!(h.load(id).await.status(), WorkoutSessionStatus::NotStarted);
    }

    #[tokio::test]
    async fn resume_while_in_progress_is_state_conflict() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let resume = ResumeWorkoutSessionHandler::new(h.uow.clone());

        let err = resume
            .handle(ResumeWorkoutSessionCommand { session_id: id }, Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
    }
}
