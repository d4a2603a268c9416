//! CompleteExerciseHandler - records an exercise's sets and closes it.
//!
//! Completing the last open exercise completes the session in the same
//! commit, so both events go out together.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, ExerciseId, WorkoutSessionId};
use crate::domain::workout::{ExerciseCompletion, ExerciseSetRecord, WorkoutSessionStatus};

#[derive(Debug, Clone)]
pub struct CompleteExerciseCommand {
    pub session_id: WorkoutSessionId,
    pub exercise_id: ExerciseId,
    pub sets: Vec<ExerciseSetRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteExerciseResult {
    pub completion: ExerciseCompletion,
    pub status: WorkoutSessionStatus,
}

pub struct CompleteExerciseHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl CompleteExerciseHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: CompleteExerciseCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteExerciseResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        let completion = session.complete_exercise(cmd.exercise_id, cmd.sets)?;
        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            exercise_id = %cmd.exercise_id,
            completed = completion.completed_exercises,
            total = completion.total_exercises,
            session_completed = completion.session_completed,
            "Exercise completed"
        );
        Ok(CompleteExerciseResult {
            completion,
            status: session.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, TypedEvent};
    use crate::domain::workout::{ExerciseCompleted, WorkoutSessionCompleted};

    fn sets() -> Vec<ExerciseSetRecord> {
        vec![
            ExerciseSetRecord::strength(1, 10, 50.0).unwrap(),
            ExerciseSetRecord::strength(2, 8, 55.0).unwrap(),
        ]
    }

    fn command(session_id: WorkoutSessionId, exercise_id: ExerciseId) -> CompleteExerciseCommand {
        CompleteExerciseCommand {
            session_id,
            exercise_id,
            sets: sets(),
        }
    }

    #[tokio::test]
    async fn completes_one_of_two_exercises() {
        let h = Harness::new();
        let (bench, row) = (ExerciseId::new(), ExerciseId::new());
        let id = h.seed_started(&[bench, row]).await;
        let handler = CompleteExerciseHandler::new(h.uow.clone());

        let result = handler
            .handle(command(id, bench), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(result.status, WorkoutSessionStatus::InProgress);
        assert_eq!(result.completion.completed_exercises, 1);
        assert!(!result.completion.session_completed);
        assert_eq!(result.completion.total_weight_moved, 940.0);
        assert_eq!(h.load(id).await.completed_exercises(), 1);
        assert_eq!(h.bus.event_count(), 1);
    }

    #[tokio::test]
    async fn last_exercise_completes_the_session() {
        let h = Harness::new();
        let bench = ExerciseId::new();
        let id = h.seed_started(&[bench]).await;
        let handler = CompleteExerciseHandler::new(h.uow.clone());

        let result = handler
            .handle(command(id, bench), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(result.status, WorkoutSessionStatus::Completed);
        assert!(result.completion.session_completed);
        let types: Vec<_> = h
            .bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(
            types,
            vec![ExerciseCompleted::EVENT_TYPE, WorkoutSessionCompleted::EVENT_TYPE]
        );
        let completed = &h.bus.events_of_type(WorkoutSessionCompleted::EVENT_TYPE)[0];
        assert_eq!(completed.payload["auto_completed"], true);
    }

    #[tokio::test]
    async fn paused_session_is_state_conflict_and_unchanged() {
        let h = Harness::new();
        let bench = ExerciseId::new();
        let id = h.seed_started(&[bench]).await;
        let mut session = h.load(id).await;
        session.pause_session().unwrap();
        h.uow.commit(&mut session, &Harness::metadata()).await.unwrap();
        let before = h.load(id).await.snapshot();
        let handler = CompleteExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(command(id, bench), Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        assert_eq!(h.load(id).await.snapshot(), before);
    }

    #[tokio::test]
    async fn unknown_exercise_is_not_found() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let handler = CompleteExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(command(id, ExerciseId::new()), Harness::metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(h.load(id).await.completed_exercises(), 0);
    }
}
