//! OutboxPublisher - background service that delivers queued events.
//!
//! The unit of work writes envelopes to the outbox after the session commit;
//! this service polls the outbox and hands each deliverable entry to the
//! `EventPublisher`, marking it published or failed. Failed entries are
//! picked up again on a later poll until the outbox stops offering them.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 100ms | Delay between polls |
//! | `batch_size` | 100 | Max entries per poll |
//! | `cleanup_interval` | 1h | Delay between retention sweeps |
//! | `retention_hours` | 24 | Age after which published entries are deleted |
//!
//! On shutdown the current batch is finished and one last batch is drained.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::config::OutboxConfig;
use crate::domain::foundation::DomainError;
use crate::ports::{EventPublisher, OutboxWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxPublisherConfig {
    pub poll_interval: Duration,
    pub batch_size: u32,
    pub cleanup_interval: Duration,
    pub retention_hours: u32,
}

impl Default for OutboxPublisherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            batch_size: 100,
            cleanup_interval: Duration::from_secs(3600),
            retention_hours: 24,
        }
    }
}

impl OutboxPublisherConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_retention_hours(mut self, hours: u32) -> Self {
        self.retention_hours = hours;
        self
    }
}

impl From<&OutboxConfig> for OutboxPublisherConfig {
    fn from(config: &OutboxConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            batch_size: config.batch_size,
            cleanup_interval: config.cleanup_interval(),
            retention_hours: config.retention_hours,
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub published: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.published == 0 && self.failed == 0
    }
}

pub struct OutboxPublisher {
    outbox: Arc<dyn OutboxWriter>,
    event_publisher: Arc<dyn EventPublisher>,
    config: OutboxPublisherConfig,
}

impl OutboxPublisher {
    pub fn new(outbox: Arc<dyn OutboxWriter>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self::with_config(outbox, event_publisher, OutboxPublisherConfig::default())
    }

    pub fn with_config(
        outbox: Arc<dyn OutboxWriter>,
        event_publisher: Arc<dyn EventPublisher>,
        config: OutboxPublisherConfig,
    ) -> Self {
        Self {
            outbox,
            event_publisher,
            config,
        }
    }

    /// Polls until `shutdown` flips to true.
    ///
    /// # Errors
    ///
    /// Returns the first outbox error; publish failures are not errors here,
    /// they are recorded on the entry.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut poll = time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cleanup = time::interval(self.config.cleanup_interval);
        cleanup.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "Outbox publisher started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        let outcome = self.process_batch().await?;
                        tracing::info!(
                            published = outcome.published,
                            failed = outcome.failed,
                            "Outbox publisher stopped"
                        );
                        return Ok(());
                    }
                }

                _ = poll.tick() => {
                    self.process_batch().await?;
                }

                _ = cleanup.tick() => {
                    let removed = self.outbox.cleanup_old(self.config.retention_hours).await?;
                    if removed > 0 {
                        tracing::debug!(removed, "Removed published outbox entries");
                    }
                }
            }
        }
    }

    /// Publishes one batch of deliverable entries.
    pub async fn process_batch(&self) -> Result<BatchOutcome, DomainError> {
        let entries = self.outbox.get_pending(self.config.batch_size).await?;
        let mut outcome = BatchOutcome::default();

        for entry in entries {
            match self.event_publisher.publish(entry.event.clone()).await {
                Ok(()) => {
                    self.outbox.mark_published(entry.id).await?;
                    outcome.published += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        event_id = %entry.event.event_id,
                        event_type = %entry.event.event_type,
                        attempt = entry.attempts + 1,
                        error = %e,
                        "Failed to publish outbox entry"
                    );
                    self.outbox.mark_failed(entry.id, &e.to_string()).await?;
                    outcome.failed += 1;
                }
            }
        }

        if !outcome.is_empty() {
            tracing::debug!(
                published = outcome.published,
                failed = outcome.failed,
                "Processed outbox batch"
            );
        }
        Ok(outcome)
    }
}
