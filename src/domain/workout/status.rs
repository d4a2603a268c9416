//! WorkoutSessionStatus enum for tracking the lifecycle of a workout session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a workout session.
///
/// ```text
/// NotStarted ──> InProgress <──> Paused
///     │              │             │
///     │              └──> Completed│
///     └──────────────┴─────────────┴──> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl WorkoutSessionStatus {
    pub const ALL: [WorkoutSessionStatus; 5] = [
        WorkoutSessionStatus::NotStarted,
        WorkoutSessionStatus::InProgress,
        WorkoutSessionStatus::Paused,
        WorkoutSessionStatus::Completed,
        WorkoutSessionStatus::Cancelled,
    ];

    /// Returns true if exercises can be worked on.
    pub fn is_active(&self) -> bool {
        matches!(self, WorkoutSessionStatus::InProgress)
    }

    /// Returns true if the session reached Completed or Cancelled.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            WorkoutSessionStatus::Completed | WorkoutSessionStatus::Cancelled
        )
    }
}

impl StateMachine for WorkoutSessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WorkoutSessionStatus::*;
        matches!(
            (self, target),
            (NotStarted, InProgress)
                | (InProgress, Paused)
                | (Paused, InProgress)
                | (InProgress, Completed)
                | (NotStarted, Cancelled)
                | (InProgress, Cancelled)
                | (Paused, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WorkoutSessionStatus::*;
        match self {
            NotStarted => vec![InProgress, Cancelled],
            InProgress => vec![Paused, Completed, Cancelled],
            Paused => vec![InProgress, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for WorkoutSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkoutSessionStatus::NotStarted => "NotStarted",
            WorkoutSessionStatus::InProgress => "InProgress",
            WorkoutSessionStatus::Paused => "Paused",
            WorkoutSessionStatus::Completed => "Completed",
            WorkoutSessionStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
