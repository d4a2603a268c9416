//! Lifecycle status enums as explicit state machines.
//!
//! A status type lists its edges once; `transition_to` is the only checked
//! way to move along them.

use std::fmt;

use super::{DomainError, ErrorCode};

/// A status enum with a fixed transition table.
///
/// ```ignore
/// impl StateMachine for WorkoutSessionStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         self.valid_transitions().contains(target)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             NotStarted => vec![InProgress, Cancelled],
///             InProgress => vec![Paused, Completed, Cancelled],
///             // ...
///         }
///     }
/// }
///
/// let paused = status.transition_to(WorkoutSessionStatus::Paused)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every status reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns `target` if the edge exists.
    ///
    /// # Errors
    ///
    /// `StateConflict` carrying `from` and `to` details otherwise.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::StateConflict,
            format!("Cannot transition from {:?} to {:?}", self, target),
        )
        .with_detail("from", format!("{:?}", self))
        .with_detail("to", format!("{:?}", target)))
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
