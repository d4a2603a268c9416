//! Event adapters.
//!
//! - `InMemoryEventBus` - In-process publisher and subscriber
//! - `IdempotentHandler` - Skips events a handler has already processed
//! - `OutboxPublisher` - Background service draining the outbox
//! - `TrainingTotalsProjection` - Per-member totals built from workout events

mod idempotent_handler;
mod in_memory;
mod outbox_publisher;
mod training_totals;

pub use idempotent_handler::IdempotentHandler;
pub use in_memory::InMemoryEventBus;
pub use outbox_publisher::{BatchOutcome, OutboxPublisher, OutboxPublisherConfig};
pub use training_totals::{TrainingTotals, TrainingTotalsProjection};
