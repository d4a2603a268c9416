//! Gym Backend - workout tracking core
//!
//! Implements the workout session aggregate on a reusable aggregate/domain
//! event foundation, with ports, in-memory adapters and a transactional
//! outbox for publishing events after commit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
