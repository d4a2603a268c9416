//! CancelWorkoutSessionHandler - abandons a session that has not completed.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{CommandMetadata, Timestamp, WorkoutSessionId};

#[derive(Debug, Clone)]
pub struct CancelWorkoutSessionCommand {
    pub session_id: WorkoutSessionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelWorkoutSessionResult {
    pub cancelled_at: Timestamp,
}

pub struct CancelWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl CancelWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: CancelWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CancelWorkoutSessionResult, WorkoutCommandError> {
        let mut session = self.uow.load(cmd.session_id).await?;
        session.cancel_session()?;
        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(session_id = %cmd.session_id, "Workout session cancelled");
        Ok(CancelWorkoutSessionResult {
            cancelled_at: session.end_time().unwrap_or_else(|| session.updated_at()),
        })
    }
}
