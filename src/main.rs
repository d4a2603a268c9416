//! gym-backend entry point.
//!
//! Loads configuration, installs tracing, wires the in-memory adapters and
//! runs the outbox publisher until Ctrl-C. A second task prunes idempotency
//! records on the outbox cleanup interval.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use gym_backend::adapters::{
    IdempotentHandler, InMemoryEventBus, InMemoryOutbox, InMemoryProcessedEventStore,
    InMemoryWorkoutSessionRepository, OutboxPublisher, OutboxPublisherConfig,
    TrainingTotalsProjection,
};
use gym_backend::application::WorkoutUnitOfWork;
use gym_backend::config::{AppConfig, OutboxConfig};
use gym_backend::domain::foundation::Timestamp;
use gym_backend::ports::{EventSubscriber, ProcessedEventStore};
use gym_backend::telemetry;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gym-backend: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&config.telemetry) {
        eprintln!("gym-backend: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "gym-backend stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    let repository = Arc::new(InMemoryWorkoutSessionRepository::new());
    let outbox = Arc::new(InMemoryOutbox::with_max_attempts(config.outbox.max_attempts));
    let bus = Arc::new(InMemoryEventBus::new());
    let processed_events = Arc::new(InMemoryProcessedEventStore::new());

    bus.subscribe_all(
        &TrainingTotalsProjection::EVENT_TYPES,
        Arc::new(IdempotentHandler::new(
            TrainingTotalsProjection::new(),
            processed_events.clone(),
        )),
    );

    let uow = WorkoutUnitOfWork::from_features(
        repository,
        outbox.clone(),
        bus.clone(),
        &config.features,
    );
    tracing::info!(
        delivery = if uow.uses_outbox() { "outbox" } else { "direct" },
        "Workout unit of work ready"
    );

    let publisher =
        OutboxPublisher::with_config(outbox, bus, OutboxPublisherConfig::from(&config.outbox));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut relay = tokio::spawn({
        let shutdown_rx = shutdown_rx.clone();
        async move { publisher.run(shutdown_rx).await }
    });
    let pruner = tokio::spawn(prune_processed_events(
        processed_events,
        config.outbox.clone(),
        shutdown_rx,
    ));

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Shutdown signal received");
            // The relay may already have exited and dropped its receiver.
            let _ = shutdown_tx.send(true);
            (&mut relay).await??;
        }
        finished = &mut relay => {
            let _ = shutdown_tx.send(true);
            finished??;
        }
    }
    pruner.await?;

    tracing::info!("gym-backend stopped");
    Ok(())
}

async fn prune_processed_events(
    store: Arc<dyn ProcessedEventStore>,
    config: OutboxConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(config.cleanup_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                let cutoff = Timestamp::now().minus_hours(i64::from(config.retention_hours));
                match store.delete_before(cutoff).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Pruned processed event records"),
                    Err(e) => tracing::warn!(error = %e, "Processed event pruning failed"),
                }
            }
        }
    }
}
