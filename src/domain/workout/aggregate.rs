//! WorkoutSession aggregate.
//!
//! A member's workout: a title, optional trainer and plan references, and an
//! ordered set of exercises tracked from NotStarted through Completed or
//! Cancelled.
//!
//! # Ownership
//!
//! The session owns its `WorkoutSessionExercise` entries (and their sets).
//! Users, trainers, plans and catalog exercises are referenced by id only.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AggregateCore, AggregateRoot, EventId, ExerciseId, StateMachine, Timestamp, TrainerId, UserId,
    WorkoutPlanId, WorkoutSessionId,
};

use super::exercise;
use super::{
    ExerciseAdded, ExerciseCompleted, ExerciseSetRecord, WorkoutError, WorkoutSessionCompleted,
    WorkoutSessionCreated, WorkoutSessionEvent, WorkoutSessionExercise, WorkoutSessionStarted,
    WorkoutSessionStatus,
};

/// Maximum length for a session title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// An exercise to attach when a session is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedExercise {
    pub exercise_id: ExerciseId,
    pub order: u32,
    pub notes: Option<String>,
}

impl PlannedExercise {
    pub fn new(exercise_id: ExerciseId, order: u32) -> Self {
        Self {
            exercise_id,
            order,
            notes: None,
        }
    }
}

/// Input for `WorkoutSession::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutSession {
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub workout_plan_id: Option<WorkoutPlanId>,
    pub title: String,
    pub notes: Option<String>,
    pub exercises: Vec<PlannedExercise>,
}

impl NewWorkoutSession {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            trainer_id: None,
            workout_plan_id: None,
            title: title.into(),
            notes: None,
            exercises: Vec::new(),
        }
    }

    pub fn with_trainer(mut self, trainer_id: TrainerId) -> Self {
        self.trainer_id = Some(trainer_id);
        self
    }

    pub fn with_plan(mut self, workout_plan_id: WorkoutPlanId) -> Self {
        self.workout_plan_id = Some(workout_plan_id);
        self
    }

    pub fn with_exercise(mut self, exercise: PlannedExercise) -> Self {
        self.exercises.push(exercise);
        self
    }
}

/// Persisted shape of a workout session.
///
/// Storage adapters keep this; `WorkoutSession::reconstitute` turns it back
/// into an aggregate without staging events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSessionSnapshot {
    pub id: WorkoutSessionId,
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub workout_plan_id: Option<WorkoutPlanId>,
    pub title: String,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub status: WorkoutSessionStatus,
    pub notes: Option<String>,
    pub completed_exercises: u32,
    pub total_exercises: u32,
    pub exercises: Vec<WorkoutSessionExercise>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What `complete_exercise` did.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCompletion {
    pub exercise_id: ExerciseId,
    pub order: u32,
    pub total_weight_moved: f64,
    pub completed_exercises: u32,
    pub total_exercises: u32,
    /// True when this was the last open exercise and the session completed.
    pub session_completed: bool,
}

/// WorkoutSession aggregate root.
///
/// # Invariants
///
/// - `id` is fixed at creation
/// - `status` only follows `WorkoutSessionStatus` transitions
/// - `completed_exercises <= total_exercises == exercises.len()`
/// - exercise orders are unique; `exercises` is sorted by order
/// - a completed exercise's sets are frozen
/// - every operation validates before mutating; a failed call changes nothing
#[derive(Debug, Clone)]
pub struct WorkoutSession {
    core: AggregateCore<WorkoutSessionId, WorkoutSessionEvent>,
    user_id: UserId,
    trainer_id: Option<TrainerId>,
    workout_plan_id: Option<WorkoutPlanId>,
    title: String,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    status: WorkoutSessionStatus,
    notes: Option<String>,
    completed_exercises: u32,
    total_exercises: u32,
    exercises: Vec<WorkoutSessionExercise>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl AggregateRoot for WorkoutSession {
    type Id = WorkoutSessionId;
    type Event = WorkoutSessionEvent;
    type Created = WorkoutSessionCreated;

    fn core(&self) -> &AggregateCore<WorkoutSessionId, WorkoutSessionEvent> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AggregateCore<WorkoutSessionId, WorkoutSessionEvent> {
        &mut self.core
    }
}

impl WorkoutSession {
    /// Creates a NotStarted session with its planned exercises attached.
    ///
    /// Stages exactly one `WorkoutSessionCreated`; the `ExerciseAdded` events
    /// of the initial exercises are suppressed by the initialization guard.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the title is blank or too long
    /// - `InvalidArgument` if two planned exercises share an order
    pub fn create(id: WorkoutSessionId, new: NewWorkoutSession) -> Result<Self, WorkoutError> {
        let title = validate_title(&new.title)?;
        let now = Timestamp::now();
        let NewWorkoutSession {
            user_id,
            trainer_id,
            workout_plan_id,
            notes,
            exercises,
            ..
        } = new;

        AggregateCore::create(
            id,
            |core| Self {
                core,
                user_id,
                trainer_id,
                workout_plan_id,
                title,
                start_time: None,
                end_time: None,
                status: WorkoutSessionStatus::NotStarted,
                notes,
                completed_exercises: 0,
                total_exercises: 0,
                exercises: Vec::new(),
                created_at: now,
                updated_at: now,
            },
            |session: &mut Self| -> Result<(), WorkoutError> {
                for planned in exercises {
                    session.add_exercise(planned.exercise_id, planned.order, planned.notes)?;
                }
                Ok(())
            },
            |session: &Self| {
                WorkoutSessionEvent::Created(WorkoutSessionCreated {
                    event_id: EventId::new(),
                    session_id: session.id(),
                    user_id: session.user_id.clone(),
                    trainer_id: session.trainer_id,
                    workout_plan_id: session.workout_plan_id,
                    title: session.title.clone(),
                    total_exercises: session.total_exercises,
                    created_at: session.created_at,
                })
            },
        )
    }

    /// Rebuilds a session from storage. No events are staged.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the snapshot breaks a session invariant.
    pub fn reconstitute(snapshot: WorkoutSessionSnapshot) -> Result<Self, WorkoutError> {
        let WorkoutSessionSnapshot {
            id,
            user_id,
            trainer_id,
            workout_plan_id,
            title,
            start_time,
            end_time,
            status,
            notes,
            completed_exercises,
            total_exercises,
            mut exercises,
            created_at,
            updated_at,
        } = snapshot;

        exercises.sort_by_key(WorkoutSessionExercise::order);
        if exercises.windows(2).any(|w| w[0].order() == w[1].order()) {
            return Err(WorkoutError::invalid_argument(
                "exercises",
                "exercise orders must be unique",
            ));
        }
        if total_exercises as usize != exercises.len() {
            return Err(WorkoutError::invalid_argument(
                "total_exercises",
                format!(
                    "expected {} attached exercises, found {}",
                    total_exercises,
                    exercises.len()
                ),
            ));
        }
        let completed = exercises.iter().filter(|e| e.is_completed()).count();
        if completed_exercises as usize != completed {
            return Err(WorkoutError::invalid_argument(
                "completed_exercises",
                format!(
                    "expected {} completed exercises, found {}",
                    completed_exercises, completed
                ),
            ));
        }

        Ok(Self {
            core: AggregateCore::reconstitute(id),
            user_id,
            trainer_id,
            workout_plan_id,
            title,
            start_time,
            end_time,
            status,
            notes,
            completed_exercises,
            total_exercises,
            exercises,
            created_at,
            updated_at,
        })
    }

    /// Persisted shape of the current state. Staged events are not included.
    pub fn snapshot(&self) -> WorkoutSessionSnapshot {
        WorkoutSessionSnapshot {
            id: self.id(),
            user_id: self.user_id.clone(),
            trainer_id: self.trainer_id,
            workout_plan_id: self.workout_plan_id,
            title: self.title.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            notes: self.notes.clone(),
            completed_exercises: self.completed_exercises,
            total_exercises: self.total_exercises,
            exercises: self.exercises.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn trainer_id(&self) -> Option<TrainerId> {
        self.trainer_id
    }

    pub fn workout_plan_id(&self) -> Option<WorkoutPlanId> {
        self.workout_plan_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn status(&self) -> WorkoutSessionStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn completed_exercises(&self) -> u32 {
        self.completed_exercises
    }

    pub fn total_exercises(&self) -> u32 {
        self.total_exercises
    }

    /// Owned exercises, sorted by order.
    pub fn exercises(&self) -> &[WorkoutSessionExercise] {
        &self.exercises
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whole seconds from start to end, once both are set. Never negative.
    pub fn duration_seconds(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.seconds_since(&start).max(0)),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Attaches an exercise to a session that has not started yet.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionState` unless NotStarted
    /// - `InvalidArgument` if `order` is already taken
    pub fn add_exercise(
        &mut self,
        exercise_id: ExerciseId,
        order: u32,
        notes: Option<String>,
    ) -> Result<(), WorkoutError> {
        self.require_status("add exercise", WorkoutSessionStatus::NotStarted)?;
        let position = match self.exercises.binary_search_by_key(&order, |e| e.order()) {
            Ok(_) => {
                return Err(WorkoutError::invalid_argument(
                    "order",
                    format!("order {} is already used in this session", order),
                ))
            }
            Err(position) => position,
        };

        let mut exercise = WorkoutSessionExercise::new(exercise_id, order);
        if let Some(notes) = notes {
            exercise = exercise.with_notes(notes);
        }
        self.exercises.insert(position, exercise);
        self.total_exercises += 1;

        let now = Timestamp::now();
        self.updated_at = now;
        let event = ExerciseAdded {
            event_id: EventId::new(),
            session_id: self.id(),
            exercise_id,
            order,
            total_exercises: self.total_exercises,
            added_at: now,
        };
        self.core.record(event.into());
        Ok(())
    }

    /// NotStarted → InProgress. Records the start time.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionState` unless NotStarted; resuming a paused session
    ///   goes through `resume_session`
    /// - `NoExercises` if no exercise has been added
    pub fn start_session(&mut self) -> Result<(), WorkoutError> {
        const OPERATION: &str = "start session";
        self.require_status(OPERATION, WorkoutSessionStatus::NotStarted)?;
        if self.total_exercises == 0 {
            return Err(WorkoutError::NoExercises {
                operation: OPERATION,
            });
        }

        let now = Timestamp::now();
        self.status = WorkoutSessionStatus::InProgress;
        self.start_time = Some(now);
        self.updated_at = now;

        let event = WorkoutSessionStarted {
            event_id: EventId::new(),
            session_id: self.id(),
            user_id: self.user_id.clone(),
            trainer_id: self.trainer_id,
            started_at: now,
        };
        self.core.record(event.into());
        Ok(())
    }

    /// InProgress → Paused.
    pub fn pause_session(&mut self) -> Result<(), WorkoutError> {
        self.require_status("pause session", WorkoutSessionStatus::InProgress)?;
        self.status = WorkoutSessionStatus::Paused;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Paused → InProgress.
    pub fn resume_session(&mut self) -> Result<(), WorkoutError> {
        self.require_status("resume session", WorkoutSessionStatus::Paused)?;
        self.status = WorkoutSessionStatus::InProgress;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records `sets` on the exercise and marks it completed.
    ///
    /// Completing the last open exercise completes the session exactly as
    /// `complete_session(None)` would.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionState` unless InProgress
    /// - `ExerciseNotFound` if the exercise is not part of the session
    /// - `ExerciseAlreadyCompleted` if every matching exercise is completed
    pub fn complete_exercise(
        &mut self,
        exercise_id: ExerciseId,
        sets: Vec<ExerciseSetRecord>,
    ) -> Result<ExerciseCompletion, WorkoutError> {
        const OPERATION: &str = "complete exercise";
        self.require_status(OPERATION, WorkoutSessionStatus::InProgress)?;
        let index = self.open_exercise(OPERATION, exercise_id)?;

        let sets_completed = u32::try_from(sets.len()).unwrap_or(u32::MAX);
        let total_reps = exercise::reps(&sets);
        let total_weight_moved = exercise::weight_moved(&sets);

        let now = Timestamp::now();
        let exercise = &mut self.exercises[index];
        exercise.complete_sets(sets, now)?;
        let order = exercise.order();

        self.completed_exercises += 1;
        self.updated_at = now;

        let event = ExerciseCompleted {
            event_id: EventId::new(),
            session_id: self.id(),
            user_id: self.user_id.clone(),
            exercise_id,
            order,
            sets_completed,
            total_reps,
            total_weight_moved,
            completed_exercises: self.completed_exercises,
            total_exercises: self.total_exercises,
            completed_at: now,
        };
        self.core.record(event.into());

        let session_completed = self.completed_exercises == self.total_exercises;
        if session_completed {
            self.finish(None, now, true);
        }

        Ok(ExerciseCompletion {
            exercise_id,
            order,
            total_weight_moved,
            completed_exercises: self.completed_exercises,
            total_exercises: self.total_exercises,
            session_completed,
        })
    }

    /// InProgress → Completed. Replaces the notes when `notes` is given.
    pub fn complete_session(&mut self, notes: Option<String>) -> Result<(), WorkoutError> {
        self.ensure_transition("complete session", WorkoutSessionStatus::Completed)?;
        self.finish(notes, Timestamp::now(), false);
        Ok(())
    }

    /// NotStarted, InProgress or Paused → Cancelled.
    pub fn cancel_session(&mut self) -> Result<(), WorkoutError> {
        self.ensure_transition("cancel session", WorkoutSessionStatus::Cancelled)?;

        let now = Timestamp::now();
        self.status = WorkoutSessionStatus::Cancelled;
        self.end_time = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Records when work on an exercise began.
    ///
    /// # Errors
    ///
    /// Same guards as `complete_exercise`.
    pub fn start_exercise(&mut self, exercise_id: ExerciseId) -> Result<(), WorkoutError> {
        const OPERATION: &str = "start exercise";
        self.require_status(OPERATION, WorkoutSessionStatus::InProgress)?;
        let index = self.open_exercise(OPERATION, exercise_id)?;

        let now = Timestamp::now();
        self.exercises[index].start_exercise(now)?;
        self.updated_at = now;
        Ok(())
    }

    /// Appends one set to an exercise that is still open.
    ///
    /// # Errors
    ///
    /// Same guards as `complete_exercise`.
    pub fn log_set(
        &mut self,
        exercise_id: ExerciseId,
        set: ExerciseSetRecord,
    ) -> Result<(), WorkoutError> {
        const OPERATION: &str = "log set";
        self.require_status(OPERATION, WorkoutSessionStatus::InProgress)?;
        let index = self.open_exercise(OPERATION, exercise_id)?;

        self.exercises[index].add_set(set)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn finish(&mut self, notes: Option<String>, now: Timestamp, auto_completed: bool) {
        self.status = WorkoutSessionStatus::Completed;
        self.end_time = Some(now);
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = now;

        let event = WorkoutSessionCompleted {
            event_id: EventId::new(),
            session_id: self.id(),
            user_id: self.user_id.clone(),
            duration_seconds: self.duration_seconds().unwrap_or(0),
            completed_exercises: self.completed_exercises,
            total_exercises: self.total_exercises,
            auto_completed,
            completed_at: now,
        };
        self.core.record(event.into());
    }

    fn require_status(
        &self,
        operation: &'static str,
        expected: WorkoutSessionStatus,
    ) -> Result<(), WorkoutError> {
        if self.status != expected {
            return Err(WorkoutError::invalid_state(operation, self.status));
        }
        Ok(())
    }

    fn ensure_transition(
        &self,
        operation: &'static str,
        target: WorkoutSessionStatus,
    ) -> Result<(), WorkoutError> {
        if !self.status.can_transition_to(&target) {
            return Err(WorkoutError::invalid_state(operation, self.status));
        }
        Ok(())
    }

    /// Index of the first incomplete exercise with this id, by order.
    fn open_exercise(
        &self,
        operation: &'static str,
        exercise_id: ExerciseId,
    ) -> Result<usize, WorkoutError> {
        let mut matched = false;
        for (index, exercise) in self.exercises.iter().enumerate() {
            if exercise.exercise_id() != exercise_id {
                continue;
            }
            if !exercise.is_completed() {
                return Ok(index);
            }
            matched = true;
        }

        if matched {
            Err(WorkoutError::already_completed(operation, exercise_id))
        } else {
            Err(WorkoutError::ExerciseNotFound(exercise_id))
        }
    }
}

fn validate_title(title: &str) -> Result<String, WorkoutError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WorkoutError::invalid_argument("title", "title cannot be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(WorkoutError::invalid_argument(
            "title",
            format!("title cannot exceed {} characters", MAX_TITLE_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}
