//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables carry the `GYM_BACKEND` prefix and
//! nested values are separated by double underscores. Every setting has a
//! default, so an empty environment yields a runnable configuration.
//!
//! # Example
//!
//! ```no_run
//! use gym_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Publishing {} events per poll", config.outbox.batch_size);
//! ```

mod error;
mod features;
mod outbox;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use outbox::OutboxConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "GYM_BACKEND";

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Outbox publisher settings
    #[serde(default)]
    pub outbox: OutboxConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `GYM_BACKEND` prefix
    /// 3. Uses `__` to separate nested values
    ///
    /// - `GYM_BACKEND__OUTBOX__BATCH_SIZE=50` -> `outbox.batch_size = 50`
    /// - `GYM_BACKEND__TELEMETRY__JSON=true` -> `telemetry.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.outbox.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
