//! ListMemberSessionsHandler - a member's sessions, most recently updated first.

use std::sync::Arc;

use crate::application::WorkoutCommandError;
use crate::domain::foundation::UserId;
use crate::domain::workout::{WorkoutSessionSnapshot, WorkoutSessionStatus};
use crate::ports::WorkoutSessionRepository;

#[derive(Debug, Clone)]
pub struct ListMemberSessionsQuery {
    pub user_id: UserId,
    /// Only sessions in this status, when set.
    pub status: Option<WorkoutSessionStatus>,
}

pub struct ListMemberSessionsHandler {
    repository: Arc<dyn WorkoutSessionRepository>,
}

impl ListMemberSessionsHandler {
    pub fn new(repository: Arc<dyn WorkoutSessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListMemberSessionsQuery,
    ) -> Result<Vec<WorkoutSessionSnapshot>, WorkoutCommandError> {
        let sessions = self.repository.find_by_user(&query.user_id).await?;
        Ok(sessions
            .iter()
            .filter(|s| query.status.map_or(true, |status| s.status() == status))
            .map(|s| s.snapshot())
            .collect())
    }
}
