//! Workout module - the WorkoutSession aggregate and its owned entities.
//!
//! - `WorkoutSession` - aggregate root and lifecycle state machine
//! - `WorkoutSessionExercise` - per-exercise progress owned by a session
//! - `ExerciseSetRecord` - one completed set
//! - `WorkoutSessionStatus` - lifecycle states
//! - Workout events staged by the aggregate

mod aggregate;
mod errors;
mod events;
mod exercise;
mod set_record;
mod status;

pub use aggregate::{
    ExerciseCompletion, NewWorkoutSession, PlannedExercise, WorkoutSession,
    WorkoutSessionSnapshot, MAX_TITLE_LENGTH,
};
pub use errors::WorkoutError;
pub use events::{
    ExerciseAdded, ExerciseCompleted, WorkoutSessionCompleted, WorkoutSessionCreated,
    WorkoutSessionEvent, WorkoutSessionStarted,
};
pub use exercise::WorkoutSessionExercise;
pub use set_record::ExerciseSetRecord;
pub use status::WorkoutSessionStatus;
