//! CompleteWorkoutSessionHandler - finishes a session early or on request.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, Timestamp, WorkoutSessionId};

#[derive(Debug, Clone)]
pub struct CompleteWorkoutSessionCommand {
    pub session_id: WorkoutSessionId,
    /// Replaces the session notes when given.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteWorkoutSessionResult {
    pub completed_at: Timestamp,
    pub duration_seconds: i64,
    pub completed_exercises: u32,
    pub total_exercises: u32,
}

pub struct CompleteWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl CompleteWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: CompleteWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteWorkoutSessionResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.complete_session(cmd.notes)?;
        self.uow.commit(&mut session, &metadata).await?;

        let result = CompleteWorkoutSessionResult {
            completed_at: session.end_time().unwrap_or_else(|| session.updated_at()),
            duration_seconds: session.duration_seconds().unwrap_or(0),
            completed_exercises: session.completed_exercises(),
            total_exercises: session.total_exercises(),
        };
        tracing::info!(
            session_id = %cmd.session_id,
            duration_seconds = result.duration_seconds,
            completed = result.completed_exercises,
            total = result.total_exercises,
            "Workout session completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::{ExerciseId, TypedEvent};
    use crate::domain::workout::{WorkoutSessionCompleted, WorkoutSessionStatus};

    #[tokio::test]
    async fn completes_with_open_exercises_and_replaces_notes() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new(), ExerciseId::new()]).await;
        let handler = CompleteWorkoutSessionHandler::new(h.uow.clone());

        let result = handler
            .handle(
                CompleteWorkoutSessionCommand {
                    session_id: id,
                    notes: Some("Felt strong".to_string()),
                },
                Harness::metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.completed_exercises, 0);
        assert_eq!(result.total_exercises, 2);
        assert!(result.duration_seconds >= 0);
        let session = h.load(id).await;
        assert_eq!(session.status(), WorkoutSessionStatus::Completed);
        assert_eq!(session.notes(), Some("Felt strong"));
        let event = &h.bus.events_of_type(WorkoutSessionCompleted::EVENT_TYPE)[0];
        assert_eq!(event.payload["auto_completed"], false);
    }

    #[tokio::test]
    async fn not_started_session_cannot_complete() {
        let h = Harness::new();
        let id = h.seed(&[]).await;
        let handler = CompleteWorkoutSessionHandler::new(h.uow.clone());

        let err = handler
            .handle(
                CompleteWorkoutSessionCommand {
                    session_id: id,
                    notes: None,
                },
                Harness::metadata(),
            )
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        assert_eq!(h.bus.event_count(), 0);
    }
}
