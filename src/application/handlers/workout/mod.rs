//! Workout session command and query handlers.
//!
//! Commands load the session through `WorkoutUnitOfWork`, call one aggregate
//! operation and commit. Queries read snapshots straight from the repository.

mod add_exercise;
mod cancel_session;
mod complete_exercise;
mod complete_session;
mod create_session;
mod get_session;
mod list_member_sessions;
mod log_set;
mod pause_session;
mod start_exercise;
mod start_session;

#[cfg(test)]
pub(crate) mod test_support;

pub use add_exercise::{AddExerciseCommand, AddExerciseHandler, AddExerciseResult};
pub use cancel_session::{
    CancelWorkoutSessionCommand, CancelWorkoutSessionHandler, CancelWorkoutSessionResult,
};
pub use complete_exercise::{
    CompleteExerciseCommand, CompleteExerciseHandler, CompleteExerciseResult,
};
pub use complete_session::{
    CompleteWorkoutSessionCommand, CompleteWorkoutSessionHandler, CompleteWorkoutSessionResult,
};
pub use create_session::{
    CreateWorkoutSessionCommand, CreateWorkoutSessionHandler, CreateWorkoutSessionResult,
};
pub use get_session::{GetWorkoutSessionHandler, GetWorkoutSessionQuery};
pub use list_member_sessions::{ListMemberSessionsHandler, ListMemberSessionsQuery};
pub use log_set::{LogSetCommand, LogSetHandler, LogSetResult};
pub use pause_session::{
    PauseWorkoutSessionCommand, PauseWorkoutSessionHandler, ResumeWorkoutSessionCommand,
    ResumeWorkoutSessionHandler, SessionStatusResult,
};
pub use start_exercise::{StartExerciseCommand, StartExerciseHandler, StartExerciseResult};
pub use start_session::{
    StartWorkoutSessionCommand, StartWorkoutSessionHandler, StartWorkoutSessionResult,
};
