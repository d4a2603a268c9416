//! AddExerciseHandler - attaches an exercise before the session starts.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, ExerciseId, WorkoutSessionId};

#[derive(Debug, Clone)]
pub struct AddExerciseCommand {
    pub session_id: WorkoutSessionId,
    pub exercise_id: ExerciseId,
    pub order: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddExerciseResult {
    pub total_exercises: u32,
}

pub struct AddExerciseHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl AddExerciseHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: AddExerciseCommand,
        metadata: CommandMetadata,
    ) -> Result<AddExerciseResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.add_exercise(cmd.exercise_id, cmd.order, cmd.notes)?;
        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            exercise_id = %cmd.exercise_id,
            order = cmd.order,
            "Exercise added to workout session"
        );
        Ok(AddExerciseResult {
            total_exercises: session.total_exercises(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, TypedEvent};
    use crate::domain::workout::ExerciseAdded;

    fn command(session_id: WorkoutSessionId, order: u32) -> AddExerciseCommand {
        AddExerciseCommand {
            session_id,
            exercise_id: ExerciseId::new(),
            order,
            notes: None,
        }
    }

    #[tokio::test]
    async fn adds_exercise_and_publishes_event() {
        let h = Harness::new();
        let id = h.seed(&[ExerciseId::new()]).await;
        let handler = AddExerciseHandler::new(h.uow.clone());

        let result = handler
            .handle(command(id, 2), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(result.total_exercises, 2);
        assert_eq!(h.load(id).await.exercises().len(), 2);
        assert!(h.bus.has_event(ExerciseAdded::EVENT_TYPE));
    }

    #[tokio::test]
    async fn duplicate_order_is_invalid_argument() {
        let h = Harness::new();
        let id = h.seed(&[ExerciseId::new()]).await;
        let handler = AddExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(command(id, 1), Harness::metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(h.load(id).await.total_exercises(), 1);
    }

    #[tokio::test]
    async fn rejected_once_started() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let handler = AddExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(command(id, 2), Harness::metadata())
            .await
            .unwrap_err();

        assert!(err.is_state_conflict());
        assert_eq!(h.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let h = Harness::new();
        let handler = AddExerciseHandler::new(h.uow.clone());

        let err = handler
            .handle(command(WorkoutSessionId::new(), 1), Harness::metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::WorkoutSessionNotFound);
    }
}
