//! Request context passed to every command handler.
//!
//! The unit of work copies it onto the envelope of each event the command
//! produces, so consumers can trace an event back to the request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Who issued a command, and under which request.
///
/// ```ignore
/// let metadata = CommandMetadata::new(member_id).with_correlation_id(request_id);
/// start_handler.handle(StartWorkoutSessionCommand { session_id }, metadata).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The member or staff account acting.
    pub user_id: UserId,

    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl CommandMetadata {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            trace_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// The caller's correlation id, or a fresh one per call when none was set.
    ///
    /// Read it once per command so every event shares the same value.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> UserId {
        UserId::new("member-123").unwrap()
    }

    #[test]
    fn explicit_correlation_id_is_stable() {
        let metadata = CommandMetadata::new(member()).with_correlation_id("req-9");

        assert_eq!(metadata.correlation_id(), "req-9");
        assert_eq!(metadata.correlation_id(), "req-9");
    }

    #[test]
    fn missing_correlation_id_is_generated() {
        let metadata = CommandMetadata::new(member());
        let generated = metadata.correlation_id();

        assert!(Uuid::parse_str(&generated).is_ok());
        assert!(metadata.trace_id().is_none());
    }

    #[test]
    fn unset_ids_are_left_out_of_json() {
        let metadata = CommandMetadata::new(member()).with_trace_id("trace-1");

        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["user_id"], "member-123");
        assert_eq!(json["trace_id"], "trace-1");
        assert!(json.get("correlation_id").is_none());
    }
}
