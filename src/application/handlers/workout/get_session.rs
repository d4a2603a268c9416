//! GetWorkoutSessionHandler - reads one session's current state.

use std::sync::Arc;

use crate::application::WorkoutCommandError;
use crate::domain::foundation::WorkoutSessionId;
use crate::domain::workout::WorkoutSessionSnapshot;
use crate::ports::WorkoutSessionRepository;

#[derive(Debug, Clone)]
pub struct GetWorkoutSessionQuery {
    pub session_id: WorkoutSessionId,
}

pub struct GetWorkoutSessionHandler {
    repository: Arc<dyn WorkoutSessionRepository>,
}

impl GetWorkoutSessionHandler {
    pub fn new(repository: Arc<dyn WorkoutSessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetWorkoutSessionQuery,
    ) -> Result<WorkoutSessionSnapshot, WorkoutCommandError> {
        self.repository
            .find_by_id(&query.session_id)
            .await?
            .map(|session| session.snapshot())
            .ok_or(WorkoutCommandError::SessionNotFound(query.session_id))
    }
}
