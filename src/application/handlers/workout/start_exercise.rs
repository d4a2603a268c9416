//! StartExerciseHandler - stamps when work on an exercise began.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, ExerciseId, Timestamp, WorkoutSessionId};

#[derive(Debug, Clone)]
pub struct StartExerciseCommand {
    pub session_id: WorkoutSessionId,
    pub exercise_id: ExerciseId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartExerciseResult {
    /// First start time; restarting an exercise keeps it.
    pub started_at: Option<Timestamp>,
}

pub struct StartExerciseHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl StartExerciseHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: StartExerciseCommand,
        metadata: CommandMetadata,
    ) -> Result<StartExerciseResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.start_exercise(cmd.exercise_id)?;
        self.uow.commit(&mut session, &metadata).await?;

        let started_at = session
            .exercises()
            .iter()
            .find(|e| e.exercise_id() == cmd.exercise_id && !e.is_completed())
            .and_then(|e| e.start_time());
        tracing::debug!(
            session_id = %cmd.session_id,
            exercise_id = %cmd.exercise_id,
            "Exercise started"
        );
        Ok(StartExerciseResult { started_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;

    #[tokio::test]
    async fn restart_keeps_first_start_time() {
        let h = Harness::new();
        let squat = ExerciseId::new();
        let id = h.seed_started(&[squat]).await;
        let handler = StartExerciseHandler::new(h.uow.clone());
        let cmd = StartExerciseCommand {
            session_id: id,
            exercise_id: squat,
        };

        let first = handler.handle(cmd.clone(), Harness::metadata()).await.unwrap();
        let second = handler.handle(cmd, Harness::metadata()).await.unwrap();

        assert!(first.started_at.is_some());
        assert_eq!(first.started_at, second.started_at);
        assert_eq!(h.load(id).await.exercises()[0].start_time(), first.started_at);
    }

    #[tokio::test]
    async fn requires_in_progress_session() {
        let h = Harness::new();
        let squat = ExerciseId::new();
        let id = h.seed(&[squat]).await;
        let handler = StartExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(
                StartExerciseCommand {
                    session_id: id,
                    exercise_id: squat,
                },
                Harness::metadata(),
            )
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
    }
}
