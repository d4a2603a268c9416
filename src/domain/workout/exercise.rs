//! WorkoutSessionExercise - per-exercise progress owned by a WorkoutSession.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExerciseId, Timestamp};

use super::{ExerciseSetRecord, WorkoutError};

/// Progress on one exercise within a session.
///
/// `exercise_id` is a weak reference to the exercise catalog; the session
/// never checks that it exists. Once completed, the set log is frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSessionExercise {
    exercise_id: ExerciseId,
    order: u32,
    is_completed: bool,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    notes: Option<String>,
    sets: Vec<ExerciseSetRecord>,
}

impl WorkoutSessionExercise {
    /// A fresh, not-yet-started exercise at the given position.
    pub fn new(exercise_id: ExerciseId, order: u32) -> Self {
        Self {
            exercise_id,
            order,
            is_completed: false,
            start_time: None,
            end_time: None,
            notes: None,
            sets: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Rebuilds an exercise from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        exercise_id: ExerciseId,
        order: u32,
        is_completed: bool,
        start_time: Option<Timestamp>,
        end_time: Option<Timestamp>,
        notes: Option<String>,
        sets: Vec<ExerciseSetRecord>,
    ) -> Self {
        Self {
            exercise_id,
            order,
            is_completed,
            start_time,
            end_time,
            notes,
            sets,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn exercise_id(&self) -> ExerciseId {
        self.exercise_id
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn sets(&self) -> &[ExerciseSetRecord] {
        &self.sets
    }

    /// Σ(reps × weight) over the logged sets, missing values counted as zero.
    pub fn total_weight_moved(&self) -> f64 {
        weight_moved(&self.sets)
    }

    pub fn total_reps(&self) -> u64 {
        reps(&self.sets)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutations
    // ═══════════════════════════════════════════════════════════════════════

    /// Records when work on this exercise began. A repeated call keeps the
    /// first start time.
    ///
    /// # Errors
    ///
    /// `ExerciseAlreadyCompleted` if the exercise is completed.
    pub fn start_exercise(&mut self, now: Timestamp) -> Result<(), WorkoutError> {
        self.ensure_open("start exercise")?;
        self.start_time.get_or_insert(now);
        Ok(())
    }

    /// Replaces the whole set log, then marks the exercise completed.
    ///
    /// # Errors
    ///
    /// `ExerciseAlreadyCompleted` if the exercise is completed.
    pub fn complete_sets(
        &mut self,
        sets: Vec<ExerciseSetRecord>,
        now: Timestamp,
    ) -> Result<(), WorkoutError> {
        self.ensure_open("complete exercise")?;
        self.sets.clear();
        self.sets.extend(sets);
        self.is_completed = true;
        self.end_time = Some(now);
        Ok(())
    }

    /// Appends one set to the log.
    ///
    /// # Errors
    ///
    /// `ExerciseAlreadyCompleted` if the exercise is completed.
    pub fn add_set(&mut self, set: ExerciseSetRecord) -> Result<(), WorkoutError> {
        self.ensure_open("add set")?;
        self.sets.push(set);
        Ok(())
    }

    fn ensure_open(&self, operation: &'static str) -> Result<(), WorkoutError> {
        if self.is_completed {
            return Err(WorkoutError::already_completed(operation, self.exercise_id));
        }
        Ok(())
    }
}

pub(crate) fn weight_moved(sets: &[ExerciseSetRecord]) -> f64 {
    sets.iter().map(ExerciseSetRecord::volume).sum()
}

/// Widened so that any number of maximal sets still fits.
pub(crate) fn reps(sets: &[ExerciseSetRecord]) -> u64 {
    sets.iter().map(|s| u64::from(s.reps().unwrap_or(0))).sum()
}
