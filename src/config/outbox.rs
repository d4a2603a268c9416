//! Outbox delivery configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POLL_INTERVAL_MS: u64 = 60_000;
const MAX_BATCH_SIZE: u32 = 10_000;

/// Settings for the outbox publisher and the outbox itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutboxConfig {
    /// Delay between polls for pending entries
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Max entries published per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Delay between retention sweeps
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    /// Published entries older than this are deleted
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u32,

    /// Publish attempts before a failed entry is left alone
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl OutboxConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 || self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ValidationError::InvalidBatchSize);
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ValidationError::InvalidCleanupInterval);
        }
        if self.retention_hours == 0 {
            return Err(ValidationError::InvalidRetention);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        Ok(())
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            retention_hours: default_retention_hours(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_batch_size() -> u32 {
    100
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

fn default_retention_hours() -> u32 {
    24
}

fn default_max_attempts() -> u32 {
    5
}
