//! Errors returned by workout command and query handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, WorkoutSessionId};
use crate::domain::workout::WorkoutError;

#[derive(Debug, Error)]
pub enum WorkoutCommandError {
    /// The aggregate rejected the operation. Nothing was persisted.
    #[error(transparent)]
    Domain(#[from] WorkoutError),

    #[error("Workout session not found: {0}")]
    SessionNotFound(WorkoutSessionId),

    /// A port failed (repository, outbox or publisher).
    #[error(transparent)]
    Infrastructure(#[from] DomainError),

    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkoutCommandError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkoutCommandError::Domain(err) => err.code(),
            WorkoutCommandError::SessionNotFound(_) => ErrorCode::WorkoutSessionNotFound,
            WorkoutCommandError::Infrastructure(err) => err.code,
            WorkoutCommandError::Serialization(_) => ErrorCode::InternalError,
        }
    }

    pub fn is_state_conflict(&self) -> bool {
        self.code() == ErrorCode::StateConflict
    }
}

impl From<WorkoutCommandError> for DomainError {
    fn from(err: WorkoutCommandError) -> Self {
        match err {
            WorkoutCommandError::Domain(err) => err.into(),
            WorkoutCommandError::SessionNotFound(id) => {
                DomainError::new(ErrorCode::WorkoutSessionNotFound, "Workout session not found")
                    .with_detail("session_id", id.to_string())
            }
            WorkoutCommandError::Infrastructure(err) => err,
            WorkoutCommandError::Serialization(err) => {
                DomainError::new(ErrorCode::InternalError, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workout::WorkoutSessionStatus;

    #[test]
    fn domain_errors_keep_their_code() {
        let err: WorkoutCommandError =
            WorkoutError::invalid_state("pause session", WorkoutSessionStatus::NotStarted).into();
        assert_eq!(err.code(), ErrorCode::StateConflict);
        assert!(err.is_state_conflict());
    }

    #[test]
    fn missing_session_converts_with_id_detail() {
        let id = WorkoutSessionId::new();
        let domain: DomainError = WorkoutCommandError::SessionNotFound(id).into();

        assert_eq!(domain.code, ErrorCode::WorkoutSessionNotFound);
        assert_eq!(domain.details.get("session_id"), Some(&id.to_string()));
    }

    #[test]
    fn infrastructure_errors_pass_through() {
        let err: WorkoutCommandError =
            DomainError::new(ErrorCode::DatabaseError, "connection reset").into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.to_string(), "[DATABASE_ERROR] connection reset");
    }
}
