//! # Worker Bootstrap
//!
//! Wires configuration, the event store, the queue adapter and the task
//! processor together and runs until shutdown.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::WorkerConfig;
use crate::error::Result;
use crate::handlers::{DistinctNameHandler, DISTINCT_NAME_TASK};
use crate::messaging::{adapter_factory, QueueAdapter};
use crate::processor::{ProcessorConfig, ProcessorStats, TaskProcessor};
use crate::store::{EventStore, RedisEventStore};

/// Run the worker described by `config` until `shutdown` resolves
///
/// Startup failures (invalid configuration, unknown adapter, unreachable
/// Redis, adapter connect failure) are returned before any delivery is
/// consumed.
#[instrument(skip_all, fields(adapter = %config.adapter.name))]
pub async fn run<F>(config: WorkerConfig, shutdown: F) -> Result<ProcessorStats>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    let factory = adapter_factory(&config.adapter.name)?;
    let adapter_config = config.adapter_config()?;

    let store = RedisEventStore::connect(&config.store.redis_address).await?;
    store.ping().await?;
    info!(address = %config.store.redis_address, "Event store reachable");

    let adapter = factory.create(&adapter_config)?;
    run_with(adapter, Arc::new(store), config.processor_config(), shutdown).await
}

/// Run a processor over an already constructed adapter and store
///
/// Registers the distinct-name handler, then blocks until `shutdown`
/// resolves or the adapter fails fatally.
pub async fn run_with<A, S, F>(
    adapter: A,
    store: Arc<S>,
    processor_config: ProcessorConfig,
    shutdown: F,
) -> Result<ProcessorStats>
where
    A: QueueAdapter,
    S: EventStore,
    F: Future<Output = ()> + Send + 'static,
{
    let mut processor = TaskProcessor::new(adapter, processor_config)?;
    processor.register(
        DISTINCT_NAME_TASK,
        Arc::new(DistinctNameHandler::new(store.clone())),
    )?;

    let handle = processor.shutdown_handle();
    let watcher = tokio::spawn(async move {
        shutdown.await;
        info!("Shutdown requested");
        handle.shutdown();
    });

    let result = processor.start().await;
    watcher.abort();

    let stats = result?;
    info!(
        store = store.store_name(),
        processed = stats.processed(),
        succeeded = stats.succeeded,
        failed = stats.failed,
        "Worker finished"
    );
    Ok(stats)
}
