//! Ports - Interfaces for external dependencies.
//!
//! Ports define the contracts between the domain and the outside world.
//! Adapters implement them.
//!
//! ## Persistence
//!
//! - `WorkoutSessionRepository` - Workout session storage
//!
//! ## Events
//!
//! - `EventPublisher` - Publishes committed domain events
//! - `EventSubscriber` / `EventHandler` - Handler registration and invocation
//! - `OutboxWriter` - Transactional outbox for delivery after commit
//! - `ProcessedEventStore` - Idempotency records for event handlers

mod event_publisher;
mod event_subscriber;
mod outbox_writer;
mod processed_event_store;
mod workout_session_repository;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use outbox_writer::{OutboxEntry, OutboxStatus, OutboxWriter};
pub use processed_event_store::ProcessedEventStore;
pub use workout_session_repository::WorkoutSessionRepository;
