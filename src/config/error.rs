//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Outbox poll interval must be between 1ms and 60000ms")]
    InvalidPollInterval,

    #[error("Outbox batch size must be between 1 and 10000")]
    InvalidBatchSize,

    #[error("Outbox cleanup interval must be at least 1 second")]
    InvalidCleanupInterval,

    #[error("Outbox retention must be at least 1 hour")]
    InvalidRetention,

    #[error("Outbox max attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),
}
