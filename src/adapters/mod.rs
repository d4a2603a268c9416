//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-process event bus, idempotent handler decorator, the
//!   outbox publisher service and the training totals projection
//! - `memory` - In-memory repository, outbox and processed-event store

pub mod events;
pub mod memory;

pub use events::{
    IdempotentHandler, InMemoryEventBus, OutboxPublisher, OutboxPublisherConfig,
    TrainingTotalsProjection,
};
pub use memory::{InMemoryOutbox, InMemoryProcessedEventStore, InMemoryWorkoutSessionRepository};
