//! CreateWorkoutSessionHandler - opens a new session for a member.

use std::sync::Arc;

use crate::application::{WorkoutCommandError, WorkoutUnitOfWork};
use crate::domain::foundation::{
    AggregateRoot, CommandMetadata, TrainerId, UserId, WorkoutPlanId, WorkoutSessionId,
};
use crate::domain::workout::{
    NewWorkoutSession, PlannedExercise, WorkoutSession, WorkoutSessionSnapshot,
};

/// Command to create a workout session.
#[derive(Debug, Clone)]
pub struct CreateWorkoutSessionCommand {
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub workout_plan_id: Option<WorkoutPlanId>,
    pub title: String,
    pub notes: Option<String>,
    pub exercises: Vec<PlannedExercise>,
}

/// Result of successful session creation.
#[derive(Debug, Clone)]
pub struct CreateWorkoutSessionResult {
    pub session: WorkoutSessionSnapshot,
}

pub struct CreateWorkoutSessionHandler {
    uow: Arc<WorkoutUnitOfWork>,
}

impl CreateWorkoutSessionHandler {
    pub fn new(uow: Arc<WorkoutUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn handle(
        &self,
        cmd: CreateWorkoutSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateWorkoutSessionResult, WorkoutCommandError> {
        let new = NewWorkoutSession {
            user_id: cmd.user_id,
            trainer_id: cmd.trainer_id,
            workout_plan_id: cmd.workout_plan_id,
            title: cmd.title,
            notes: cmd.notes,
            exercises: cmd.exercises,
        };
        let mut session = WorkoutSession::create(WorkoutSessionId::new(), new)?;

        self.uow.commit(&mut session, &metadata).await?;

        tracing::info!(
            session_id = %session.id(),
            user_id = %session.user_id(),
            exercises = session.total_exercises(),
            "Workout session created"
        );
        Ok(CreateWorkoutSessionResult {
            session: session.snapshot(),
        })
    }
}
