//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types, the domain event contract
//! and the aggregate building blocks every gym aggregate is composed from.

mod aggregate;
mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use aggregate::{AggregateCore, AggregateRoot, EventBuffer};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
    TypedEvent,
};
pub use ids::{ExerciseId, TrainerId, UserId, WorkoutPlanId, WorkoutSessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
