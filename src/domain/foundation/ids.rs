//! Identifier newtypes.
//!
//! Aggregate and catalogue ids are UUIDs. Member ids come from the auth
//! provider and are opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh random (v4) id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Identity of a workout session aggregate.
    WorkoutSessionId
);

uuid_id!(TrainerId);

uuid_id!(WorkoutPlanId);

uuid_id!(
    /// Entry in the exercise catalogue.
    ///
    /// Sessions only reference it; nothing here checks that it exists.
    ExerciseId
);

/// Member or staff account, as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Rejects empty and whitespace-only ids.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(WorkoutSessionId::new(), WorkoutSessionId::new());
    }

    #[test]
    fn display_and_parse_agree() {
        let id: ExerciseId = SAMPLE.parse().unwrap();
        assert_eq!(id.to_string(), SAMPLE);
        assert_eq!(id.to_string().parse::<ExerciseId>().unwrap(), id);
    }

    #[test]
    fn uuid_ids_serialize_as_plain_strings() {
        let id: TrainerId = SAMPLE.parse().unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(SAMPLE));
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        assert!("plan-7".parse::<WorkoutPlanId>().is_err());
    }

    #[test]
    fn user_id_keeps_the_provider_value() {
        assert_eq!(UserId::new("auth0|42").unwrap().as_str(), "auth0|42");
    }

    #[test]
    fn blank_user_id_names_the_field() {
        let err = UserId::new(" \t").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("user_id"));
    }
}
