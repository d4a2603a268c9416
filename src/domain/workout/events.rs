//! Workout session domain events.
//!
//! - `WorkoutSessionCreated` - Session created (forced through the init guard)
//! - `ExerciseAdded` - Exercise attached after creation
//! - `WorkoutSessionStarted` - Session moved to InProgress
//! - `ExerciseCompleted` - Exercise finished with its sets
//! - `WorkoutSessionCompleted` - Session finished, manually or automatically
//!
//! Pause, resume and cancel are state changes without events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, DomainEvent, EventId, ExerciseId, Timestamp, TrainerId, TypedEvent, UserId,
    WorkoutPlanId, WorkoutSessionId,
};

const AGGREGATE_TYPE: &str = "WorkoutSession";

// ════════════════════════════════════════════════════════════════════════════
// WorkoutSessionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a workout session is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSessionCreated {
    pub event_id: EventId,
    pub session_id: WorkoutSessionId,
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub workout_plan_id: Option<WorkoutPlanId>,
    pub title: String,
    /// Exercises attached during creation.
    pub total_exercises: u32,
    pub created_at: Timestamp,
}

domain_event!(
    WorkoutSessionCreated,
    event_type = "workout_session.created.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkoutSession",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ExerciseAdded
// ════════════════════════════════════════════════════════════════════════════

/// Published when an exercise is attached to a not-yet-started session.
///
/// Never published for exercises attached during creation; those are
/// summarized by `WorkoutSessionCreated::total_exercises`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAdded {
    pub event_id: EventId,
    pub session_id: WorkoutSessionId,
    pub exercise_id: ExerciseId,
    pub order: u32,
    pub total_exercises: u32,
    pub added_at: Timestamp,
}

domain_event!(
    ExerciseAdded,
    event_type = "workout_session.exercise_added.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkoutSession",
    occurred_at = added_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WorkoutSessionStarted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the member starts the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSessionStarted {
    pub event_id: EventId,
    pub session_id: WorkoutSessionId,
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub started_at: Timestamp,
}

domain_event!(
    WorkoutSessionStarted,
    event_type = "workout_session.started.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkoutSession",
    occurred_at = started_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ExerciseCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when an exercise is completed with its sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCompleted {
    pub event_id: EventId,
    pub session_id: WorkoutSessionId,
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub order: u32,
    pub sets_completed: u32,
    pub total_reps: u64,
    /// Σ(reps × weight); a missing reps or weight counts as zero.
    pub total_weight_moved: f64,
    pub completed_exercises: u32,
    pub total_exercises: u32,
    pub completed_at: Timestamp,
}

domain_event!(
    ExerciseCompleted,
    event_type = "workout_session.exercise_completed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkoutSession",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WorkoutSessionCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the session reaches Completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSessionCompleted {
    pub event_id: EventId,
    pub session_id: WorkoutSessionId,
    pub user_id: UserId,
    /// Seconds between start and end; never negative.
    pub duration_seconds: i64,
    pub completed_exercises: u32,
    pub total_exercises: u32,
    /// True when triggered by completing the last exercise.
    pub auto_completed: bool,
    pub completed_at: Timestamp,
}

domain_event!(
    WorkoutSessionCompleted,
    event_type = "workout_session.completed.v1",
    schema_version = 1,
    aggregate_id = session_id,
    aggregate_type = "WorkoutSession",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// WorkoutSessionEvent
// ════════════════════════════════════════════════════════════════════════════

/// Every event a workout session can stage.
///
/// Serializes as the inner event, so an envelope payload has the same shape
/// as the concrete event struct and can be read back with `payload_as`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkoutSessionEvent {
    Created(WorkoutSessionCreated),
    ExerciseAdded(ExerciseAdded),
    Started(WorkoutSessionStarted),
    ExerciseCompleted(ExerciseCompleted),
    Completed(WorkoutSessionCompleted),
}

impl WorkoutSessionEvent {
    /// Routing keys of every workout session event.
    pub const EVENT_TYPES: [&'static str; 5] = [
        WorkoutSessionCreated::EVENT_TYPE,
        ExerciseAdded::EVENT_TYPE,
        WorkoutSessionStarted::EVENT_TYPE,
        ExerciseCompleted::EVENT_TYPE,
        WorkoutSessionCompleted::EVENT_TYPE,
    ];

    fn inner(&self) -> &dyn DomainEvent {
        match self {
            WorkoutSessionEvent::Created(e) => e,
            WorkoutSessionEvent::ExerciseAdded(e) => e,
            WorkoutSessionEvent::Started(e) => e,
            WorkoutSessionEvent::ExerciseCompleted(e) => e,
            WorkoutSessionEvent::Completed(e) => e,
        }
    }
}

impl DomainEvent for WorkoutSessionEvent {
    fn event_type(&self) -> &'static str {
        self.inner().event_type()
    }

    fn schema_version(&self) -> u32 {
        self.inner().schema_version()
    }

    fn aggregate_id(&self) -> String {
        self.inner().aggregate_id()
    }

    fn aggregate_type(&self) -> &'static str {
        AGGREGATE_TYPE
    }

    fn occurred_at(&self) -> Timestamp {
        self.inner().occurred_at()
    }

    fn event_id(&self) -> EventId {
        self.inner().event_id()
    }
}

impl From<WorkoutSessionCreated> for WorkoutSessionEvent {
    fn from(event: WorkoutSessionCreated) -> Self {
        WorkoutSessionEvent::Created(event)
    }
}

impl From<ExerciseAdded> for WorkoutSessionEvent {
    fn from(event: ExerciseAdded) -> Self {
        WorkoutSessionEvent::ExerciseAdded(event)
    }
}

impl From<WorkoutSessionStarted> for WorkoutSessionEvent {
    fn from(event: WorkoutSessionStarted) -> Self {
        WorkoutSessionEvent::Started(event)
    }
}

impl From<ExerciseCompleted> for WorkoutSessionEvent {
    fn from(event: ExerciseCompleted) -> Self {
        WorkoutSessionEvent::ExerciseCompleted(event)
    }
}

impl From<WorkoutSessionCompleted> for WorkoutSessionEvent {
    fn from(event: WorkoutSessionCompleted) -> Self {
        WorkoutSessionEvent::Completed(event)
    }
}
