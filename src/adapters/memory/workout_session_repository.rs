//! In-memory WorkoutSession repository.
//!
//! Stores `WorkoutSessionSnapshot`s and rebuilds aggregates on read, so a
//! loaded session never carries staged events. Writes can be made to fail on
//! demand to exercise the unit of work's abort path.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AggregateRoot, DomainError, ErrorCode, UserId, WorkoutSessionId,
};
use crate::domain::workout::{WorkoutSession, WorkoutSessionSnapshot};
use crate::ports::WorkoutSessionRepository;

#[derive(Default)]
pub struct InMemoryWorkoutSessionRepository {
    sessions: RwLock<HashMap<WorkoutSessionId, WorkoutSessionSnapshot>>,
    fail_writes: AtomicBool,
}

impl InMemoryWorkoutSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, `save` and `update` return `DatabaseError` without storing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Workout session store is unavailable",
            ));
        }
        Ok(())
    }
}

fn restore(snapshot: WorkoutSessionSnapshot) -> Result<WorkoutSession, DomainError> {
    let id = snapshot.id;
    WorkoutSession::reconstitute(snapshot).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Stored workout session {} is invalid: {}", id, e),
        )
    })
}

#[async_trait]
impl WorkoutSessionRepository for InMemoryWorkoutSessionRepository {
    async fn save(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;
        let id = session.id();
        if sessions.contains_key(&id) {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Workout session {} already exists", id),
            ));
        }
        sessions.insert(id, session.snapshot());
        Ok(())
    }

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut sessions = self.sessions.write().await;
        let id = session.id();
        match sessions.get_mut(&id) {
            Some(stored) => {
                *stored = session.snapshot();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::WorkoutSessionNotFound,
                format!("Workout session {} not found", id),
            )),
        }
    }

    async fn find_by_id(
        &self,
        id: &WorkoutSessionId,
    ) -> Result<Option<WorkoutSession>, DomainError> {
        let snapshot = self.sessions.read().await.get(id).cloned();
        snapshot.map(restore).transpose()
    }

    async fn exists(&self, id: &WorkoutSessionId) -> Result<bool, DomainError> {
        Ok(self.sessions.read().await.contains_key(id))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<WorkoutSession>, DomainError> {
        let mut snapshots: Vec<WorkoutSessionSnapshot> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        snapshots.into_iter().map(restore).collect()
    }
}
