//! Workout-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ExerciseId, ValidationError};

use super::WorkoutSessionStatus;

/// Errors raised by the workout session aggregate and its owned entities.
///
/// Every variant is returned before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkoutError {
    /// Operation is not valid for the session's current status.
    #[error("Cannot {operation} while session is {status}")]
    InvalidSessionState {
        operation: &'static str,
        status: WorkoutSessionStatus,
    },

    /// Operation is not valid because the exercise is already completed.
    #[error("Cannot {operation}: exercise {exercise_id} is already completed")]
    ExerciseAlreadyCompleted {
        operation: &'static str,
        exercise_id: ExerciseId,
    },

    /// The session has no exercises to work through.
    #[error("Cannot {operation}: session has no exercises")]
    NoExercises { operation: &'static str },

    /// The exercise is not part of this session.
    #[error("Exercise {0} is not part of this session")]
    ExerciseNotFound(ExerciseId),

    /// Malformed input.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },
}

impl WorkoutError {
    pub fn invalid_state(operation: &'static str, status: WorkoutSessionStatus) -> Self {
        WorkoutError::InvalidSessionState { operation, status }
    }

    pub fn already_completed(operation: &'static str, exercise_id: ExerciseId) -> Self {
        WorkoutError::ExerciseAlreadyCompleted {
            operation,
            exercise_id,
        }
    }

    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkoutError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Category of the error in the shared taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkoutError::InvalidSessionState { .. }
            | WorkoutError::ExerciseAlreadyCompleted { .. }
            | WorkoutError::NoExercises { .. } => ErrorCode::StateConflict,
            WorkoutError::ExerciseNotFound(_) => ErrorCode::NotFound,
            WorkoutError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
        }
    }

    pub fn is_state_conflict(&self) -> bool {
        self.code() == ErrorCode::StateConflict
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code() == ErrorCode::InvalidArgument
    }
}

impl From<ValidationError> for WorkoutError {
    fn from(err: ValidationError) -> Self {
        WorkoutError::invalid_argument(err.field().to_string(), err.to_string())
    }
}

impl From<WorkoutError> for DomainError {
    fn from(err: WorkoutError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err {
            WorkoutError::ExerciseNotFound(id)
            | WorkoutError::ExerciseAlreadyCompleted {
                exercise_id: id, ..
            } => domain.with_detail("exercise_id", id.to_string()),
            WorkoutError::InvalidSessionState { status, .. } => {
                domain.with_detail("status", status.to_string())
            }
            WorkoutError::NoExercises { .. } => domain,
            WorkoutError::InvalidArgument { field, .. } => domain.with_detail("field", field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_map_to_state_conflict() {
        let err = WorkoutError::invalid_state("pause session", WorkoutSessionStatus::NotStarted);
        assert_eq!(err.code(), ErrorCode::StateConflict);
        assert_eq!(err.to_string(), "Cannot pause session while session is NotStarted");

        let err = WorkoutError::already_completed("add set", ExerciseId::new());
        assert!(err.is_state_conflict());

        let err = WorkoutError::NoExercises { operation: "start session" };
        assert!(err.is_state_conflict());
        assert_eq!(err.to_string(), "Cannot start session: session has no exercises");
    }

    #[test]
    fn missing_exercise_maps_to_not_found() {
        let id = ExerciseId::new();
        let err = WorkoutError::ExerciseNotFound(id);
        assert!(err.is_not_found());

        let domain: DomainError = err.into();
        assert_eq!(domain.code, ErrorCode::NotFound);
        assert_eq!(domain.details.get("exercise_id"), Some(&id.to_string()));
    }

    #[test]
    fn validation_error_becomes_invalid_argument() {
        let err: WorkoutError = ValidationError::not_positive("set_number", 0).into();
        assert!(err.is_invalid_argument());
        match err {
            WorkoutError::InvalidArgument { field, .. } => assert_eq!(field, "set_number"),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }
}
