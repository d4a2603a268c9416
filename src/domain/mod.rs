//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, events,
//!   aggregate building blocks)
//! - `workout` - Workout session aggregate and lifecycle state machine
//!
//! Nothing in this layer performs I/O.

pub mod foundation;
pub mod workout;
