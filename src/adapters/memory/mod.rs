//! In-memory storage adapters.
//!
//! - `InMemoryWorkoutSessionRepository` - Session snapshots keyed by id
//! - `InMemoryOutbox` - Transactional outbox queue
//! - `InMemoryProcessedEventStore` - Handler idempotency records
//!
//! Each write path can be switched to fail so the abort path of the unit of
//! work is testable.

mod outbox;
mod processed_event_store;
mod workout_session_repository;

pub use outbox::{InMemoryOutbox, DEFAULT_MAX_ATTEMPTS};
pub use processed_event_store::InMemoryProcessedEventStore;
pub use workout_session_repository::InMemoryWorkoutSessionRepository;
