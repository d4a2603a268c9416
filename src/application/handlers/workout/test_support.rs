//! Shared wiring for handler tests.

use std::sync::Arc;

use crate::adapters::memory::InMemoryWorkoutSessionRepository;
use crate::adapters::InMemoryEventBus;
use crate::application::WorkoutUnitOfWork;
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, ExerciseId, UserId, WorkoutSessionId,
};
use crate::domain::workout::{NewWorkoutSession, PlannedExercise, WorkoutSession};
use crate::ports::WorkoutSessionRepository;

pub(crate) struct Harness {
    pub repo: Arc<InMemoryWorkoutSessionRepository>,
    pub bus: Arc<InMemoryEventBus>,
    pub uow: Arc<WorkoutUnitOfWork>,
}

impl Harness {
    pub fn new() -> Self {
        let repo = Arc::new(InMemoryWorkoutSessionRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let uow = Arc::new(WorkoutUnitOfWork::with_publisher(repo.clone(), bus.clone()));
        Self { repo, bus, uow }
    }

    pub fn member() -> UserId {
        UserId::new("member-1").unwrap()
    }

    pub fn metadata() -> CommandMetadata {
        CommandMetadata::new(Self::member()).with_correlation_id("req-1")
    }

    /// Stores a NotStarted session with one exercise per id, ordered 1..
    pub async fn seed(&self, exercises: &[ExerciseId]) -> WorkoutSessionId {
        let mut new = NewWorkoutSession::new(Self::member(), "Push day");
        for (i, exercise_id) in exercises.iter().enumerate() {
            new = new.with_exercise(PlannedExercise::new(*exercise_id, i as u32 + 1));
        }
        let mut session = WorkoutSession::create(WorkoutSessionId::new(), new).unwrap();
        self.uow.commit(&mut session, &Self::metadata()).await.unwrap();
        self.bus.clear();
        session.id()
    }

    /// Like `seed`, then starts the session.
    pub async fn seed_started(&self, exercises: &[ExerciseId]) -> WorkoutSessionId {
        let id = self.seed(exercises).await;
        let mut session = self.load(id).await;
        session.start_session().unwrap();
        self.uow.commit(&mut session, &Self::metadata()).await.unwrap();
        self.bus.clear();
        id
    }

    pub async fn load(&self, id: WorkoutSessionId) -> WorkoutSession {
        self.repo.find_by_id(&id).await.unwrap().unwrap()
    }
}
