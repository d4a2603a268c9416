//! LogSetHandler - appends one set to an open exercise.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, ExerciseId, WorkoutSessionId};
use crate::domain::workout::ExerciseSetRecord;

#[derive(Debug, Clone)]
pub struct LogSetCommand {
    pub session_id: WorkoutSessionId,
    pub exercise_id: ExerciseId,
    pub set: ExerciseSetRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSetResult {
    pub sets_logged: usize,
}

pub struct LogSetHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl LogSetHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: LogSetCommand,
        metadata: CommandMetadata,
    ) -> Result<LogSetResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.log_set(cmd.exercise_id, cmd.set)?;
        self.uow.commit(&mut session, &metadata).await?;

        let sets_logged = session
            .exercises()
            .iter()
            .find(|e| e.exercise_id() == cmd.exercise_id && !e.is_completed())
            .map_or(0, |e| e.sets().len());
        tracing::debug!(
            session_id = %cmd.session_id,
            exercise_id = %cmd.exercise_id,
            sets_logged,
            "Set logged"
        );
        Ok(LogSetResult { sets_logged })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::workout::test_support::Harness;
    use crate::domain::foundation::ErrorCode;

    fn command(session_id: WorkoutSessionId, exercise_id: ExerciseId, n: u32) -> LogSetCommand {
        LogSetCommand {
            session_id,
            exercise_id,
            set: ExerciseSetRecord::strength(n, 5, 100.0).unwrap(),
        }
    }

    #[tokio::test]
    async fn sets_accumulate_across_commands() {
        let h = Harness::new();
        let deadlift = ExerciseId::new();
        let id = h.seed_started(&[deadlift]).await;
        let handler = LogSetHandler::new(h.uow.clone());

        handler
            .handle(command(id, deadlift, 1), Harness::metadata())
            .await
            .unwrap();
        let result = handler
            .handle(command(id, deadlift, 2), Harness::metadata())
            .await
            .unwrap();

        assert_eq!(result.sets_logged, 2);
        let session = h.load(id).await;
        assert_eq!(session.exercises()[0].total_weight_moved(), 1000.0);
        assert!(!session.exercises()[0].is_completed());
        assert_eq!(h.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_exercise_is_not_found() {
        let h = Harness::new();
        let id = h.seed_started(&[ExerciseId::new()]).await;
        let handler = LogSetHandler::new(h.uow.clone());

        let err = handler
            .handle(command(id, ExerciseId::new(), 1), Harness::metadata())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
