//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate a session and commit it through
//! `WorkoutUnitOfWork`; query handlers read snapshots.

mod errors;
pub mod handlers;
mod unit_of_work;

pub use errors::WorkoutCommandError;
pub use handlers::{
    AddExerciseCommand, AddExerciseHandler, AddExerciseResult, CancelWorkoutSessionCommand,
    CancelWorkoutSessionHandler, CancelWorkoutSessionResult, CompleteExerciseCommand,
    CompleteExerciseHandler, CompleteExerciseResult, CompleteWorkoutSessionCommand,
    CompleteWorkoutSessionHandler, CompleteWorkoutSessionResult, CreateWorkoutSessionCommand,
    CreateWorkoutSessionHandler, CreateWorkoutSessionResult, GetWorkoutSessionHandler,
    GetWorkoutSessionQuery, ListMemberSessionsHandler, ListMemberSessionsQuery, LogSetCommand,
    LogSetHandler, LogSetResult, PauseWorkoutSessionCommand, PauseWorkoutSessionHandler,
    ResumeWorkoutSessionCommand, ResumeWorkoutSessionHandler, SessionStatusResult,
    StartExerciseCommand, StartExerciseHandler, StartExerciseResult, StartWorkoutSessionCommand,
    StartWorkoutSessionHandler, StartWorkoutSessionResult,
};
pub use unit_of_work::{EventDelivery, WorkoutUnitOfWork};
