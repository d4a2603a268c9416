//! WorkoutSession repository port (write side).
//!
//! Implementations store the aggregate's persisted state and rebuild it with
//! `WorkoutSession::reconstitute`, which never re-stages historical events.
//! Publishing the staged events is the unit of work's job, not the
//! repository's.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WorkoutSessionId};
use crate::domain::workout::WorkoutSession;

/// Repository port for WorkoutSession persistence.
#[async_trait]
pub trait WorkoutSessionRepository: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a session with this id is stored
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &WorkoutSession) -> Result<(), DomainError>;

    /// Replace the stored state of an existing session.
    ///
    /// # Errors
    ///
    /// - `WorkoutSessionNotFound` if the session was never saved
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError>;

    /// Returns `None` if no session has this id.
    async fn find_by_id(&self, id: &WorkoutSessionId)
        -> Result<Option<WorkoutSession>, DomainError>;

    async fn exists(&self, id: &WorkoutSessionId) -> Result<bool, DomainError>;

    /// A member's sessions, most recently updated first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<WorkoutSession>, DomainError>;
}
