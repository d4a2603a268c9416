//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureFlags {
    /// Route committed events through the outbox. When off, the unit of work
    /// publishes directly after the commit and a publish failure is only
    /// logged.
    #[serde(default = "default_publish_via_outbox")]
    pub publish_via_outbox: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            publish_via_outbox: default_publish_via_outbox(),
        }
    }
}

fn default_publish_via_outbox() -> bool {
    true
}
