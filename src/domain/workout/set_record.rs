//! ExerciseSetRecord value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// One completed set of an exercise.
///
/// Immutable once built. Two records are equal when all five measurements
/// match, with absent values compared as zero: a set logged with `reps: None`
/// equals the same set logged with `reps: Some(0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawSetRecord")]
pub struct ExerciseSetRecord {
    set_number: u32,
    reps: Option<u32>,
    weight: Option<f64>,
    duration_seconds: Option<u32>,
    distance: Option<f64>,
}

impl ExerciseSetRecord {
    /// Creates a set record.
    ///
    /// # Errors
    ///
    /// - `NotPositive` if `set_number` is zero
    /// - `InvalidFormat` if weight or distance is negative or not finite
    pub fn new(
        set_number: u32,
        reps: Option<u32>,
        weight: Option<f64>,
        duration_seconds: Option<u32>,
        distance: Option<f64>,
    ) -> Result<Self, ValidationError> {
        if set_number == 0 {
            return Err(ValidationError::not_positive("set_number", 0));
        }
        validate_measure("weight", weight)?;
        validate_measure("distance", distance)?;

        Ok(Self {
            set_number,
            reps,
            weight,
            duration_seconds,
            distance,
        })
    }

    /// A strength set: repetitions at a load.
    pub fn strength(set_number: u32, reps: u32, weight: f64) -> Result<Self, ValidationError> {
        Self::new(set_number, Some(reps), Some(weight), None, None)
    }

    /// A cardio/timed set: duration and optional distance.
    pub fn timed(
        set_number: u32,
        duration_seconds: u32,
        distance: Option<f64>,
    ) -> Result<Self, ValidationError> {
        Self::new(set_number, None, None, Some(duration_seconds), distance)
    }

    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    pub fn reps(&self) -> Option<u32> {
        self.reps
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn duration_seconds(&self) -> Option<u32> {
        self.duration_seconds
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// reps × weight, counting a missing value as zero.
    pub fn volume(&self) -> f64 {
        f64::from(self.reps.unwrap_or(0)) * self.weight.unwrap_or(0.0)
    }

    fn normalized(&self) -> (u32, u32, f64, u32, f64) {
        (
            self.set_number,
            self.reps.unwrap_or(0),
            self.weight.unwrap_or(0.0),
            self.duration_seconds.unwrap_or(0),
            self.distance.unwrap_or(0.0),
        )
    }
}

fn validate_measure(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::invalid_format(field, "must be a finite number")),
        Some(v) if v < 0.0 => Err(ValidationError::invalid_format(field, "cannot be negative")),
        _ => Ok(()),
    }
}

impl PartialEq for ExerciseSetRecord {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

// Weights and distances are validated finite, so equality is reflexive.
impl Eq for ExerciseSetRecord {}

#[derive(Deserialize)]
struct RawSetRecord {
    set_number: u32,
    reps: Option<u32>,
    weight: Option<f64>,
    duration_seconds: Option<u32>,
    distance: Option<f64>,
}

impl TryFrom<RawSetRecord> for ExerciseSetRecord {
    type Error = ValidationError;

    fn try_from(raw: RawSetRecord) -> Result<Self, Self::Error> {
        Self::new(
            raw.set_number,
            raw.reps,
            raw.weight,
            raw.duration_seconds,
            raw.distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_set_number() {
        let err = ExerciseSetRecord::strength(0, 10, 50.0).unwrap_err();
        assert_eq!(err, ValidationError::not_positive("set_number", 0));
    }

    #[test]
    fn rejects_negative_weight() {
        assert!(ExerciseSetRecord::strength(1, 10, -5.0).is_err());
    }

    #[test]
    fn rejects_non_finite_distance() {
        assert!(ExerciseSetRecord::timed(1, 600, Some(f64::NAN)).is_err());
        assert!(ExerciseSetRecord::timed(1, 600, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn all_measurements_are_optional() {
        let set = ExerciseSetRecord::new(3, None, None, None, None).unwrap();
        assert_eq!(set.set_number(), 3);
        assert!(set.reps().is_none());
        assert!(set.weight().is_none());
    }

    #[test]
    fn absent_values_equal_zero_values() {
        let absent = ExerciseSetRecord::new(1, None, None, None, None).unwrap();
        let zeroed = ExerciseSetRecord::new(1, Some(0), Some(0.0), Some(0), Some(0.0)).unwrap();
        assert_eq!(absent, zeroed);
    }

    #[test]
    fn differing_set_numbers_are_not_equal() {
        let a = ExerciseSetRecord::strength(1, 10, 50.0).unwrap();
        let b = ExerciseSetRecord::strength(2, 10, 50.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn volume_treats_missing_as_zero() {
        assert_eq!(ExerciseSetRecord::strength(1, 10, 50.0).unwrap().volume(), 500.0);
        let bodyweight = ExerciseSetRecord::new(1, Some(15), None, None, None).unwrap();
        assert_eq!(bodyweight.volume(), 0.0);
        assert_eq!(bodyweight.weight(), None);
    }

    #[test]
    fn deserialization_runs_validation() {
        let ok: ExerciseSetRecord =
            serde_json::from_str(r#"{"set_number":1,"reps":8,"weight":60.0}"#).unwrap();
        assert_eq!(ok, ExerciseSetRecord::strength(1, 8, 60.0).unwrap());

        let bad = serde_json::from_str::<ExerciseSetRecord>(r#"{"set_number":0}"#);
        assert!(bad.is_err());
    }
}
