//! # Task Processor
//!
//! Drains a [`QueueAdapter`] through a fixed pool of worker slots and routes
//! every delivery to the handler registered for its task name.
//!
//! Each slot is a tokio task that loops: poll the adapter (bounded by
//! `wait_timeout`), dispatch, ack or nack. Slots share the adapter, the
//! registry and the counters; they do not coordinate with each other, so
//! ordering holds within a slot only.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use super::config::ProcessorConfig;
use super::errors::{ProcessorError, ProcessorResult};
use super::stats::{ProcessorStats, StatsCounters};
use crate::handlers::{HandlerError, HandlerResult, TaskHandler};
use crate::messaging::{AdapterResult, Delivery, QueueAdapter};
use crate::registry::HandlerRegistry;

/// Cloneable handle that asks a running processor to stop
///
/// Slots finish the delivery they are handling, then exit.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Live view of the processor counters
#[derive(Debug, Clone)]
pub struct StatsHandle {
    counters: Arc<StatsCounters>,
}

impl StatsHandle {
    pub fn snapshot(&self) -> ProcessorStats {
        self.counters.snapshot()
    }
}

pub struct TaskProcessor<A: QueueAdapter> {
    adapter: A,
    registry: HandlerRegistry,
    config: ProcessorConfig,
    shutdown: Arc<watch::Sender<bool>>,
    counters: Arc<StatsCounters>,
}

impl<A: QueueAdapter> std::fmt::Debug for TaskProcessor<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcessor")
            .field("adapter", &self.adapter.adapter_name())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

impl<A: QueueAdapter> TaskProcessor<A> {
    /// Create a processor over `adapter`; the configuration is validated here
    pub fn new(adapter: A, config: ProcessorConfig) -> ProcessorResult<Self> {
        config.validate()?;
        let (tx, _rx) = watch::channel(false);
        Ok(Self {
            adapter,
            registry: HandlerRegistry::new(),
            config,
            shutdown: Arc::new(tx),
            counters: Arc::new(StatsCounters::default()),
        })
    }

    /// Bind a handler to a task name
    pub fn register(
        &mut self,
        task_name: impl Into<String>,
        handler: Arc<dyn TaskHandler>,
    ) -> ProcessorResult<()> {
        self.registry.register(task_name, handler)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown.clone(),
        }
    }

    pub fn stats_handle(&self) -> StatsHandle {
        StatsHandle {
            counters: self.counters.clone(),
        }
    }

    /// Connect the adapter and run the worker slots until shutdown
    ///
    /// Returns the final counters on a requested shutdown. A failed connect or
    /// a fatal adapter error observed by any slot stops every slot and is
    /// returned instead.
    pub async fn start(self) -> ProcessorResult<ProcessorStats> {
        let Self {
            adapter,
            registry,
            config,
            shutdown,
            counters,
        } = self;

        adapter.connect().await?;

        info!(
            adapter = adapter.adapter_name(),
            concurrency = config.concurrency,
            wait_timeout_ms = config.wait_timeout.as_millis() as u64,
            tasks = ?registry.task_names(),
            "🚀 Task processor starting"
        );

        let context = Arc::new(SlotContext {
            adapter,
            registry,
            config,
            counters,
        });

        let mut slots = JoinSet::new();
        for slot in 0..context.config.concurrency {
            let context = context.clone();
            let stop = shutdown.subscribe();
            slots.spawn(async move { context.run_slot(slot, stop).await });
        }

        let mut failure: Option<ProcessorError> = None;
        while let Some(joined) = slots.join_next().await {
            let outcome = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(adapter_error)) => {
                    error!(error = %adapter_error, "Fatal adapter error, stopping all worker slots");
                    ProcessorError::Adapter(adapter_error)
                }
                Err(join_error) => {
                    error!(error = %join_error, "Worker slot terminated abnormally");
                    ProcessorError::SlotPanicked {
                        message: join_error.to_string(),
                    }
                }
            };
            shutdown.send_replace(true);
            failure.get_or_insert(outcome);
        }

        let stats = context.counters.snapshot();
        info!(
            received = stats.received,
            succeeded = stats.succeeded,
            failed = stats.failed,
            unregistered = stats.unregistered,
            adapter_errors = stats.adapter_errors,
            "🛑 Task processor stopped"
        );

        match failure {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }
}

struct SlotContext<A> {
    adapter: A,
    registry: HandlerRegistry,
    config: ProcessorConfig,
    counters: Arc<StatsCounters>,
}

impl<A: QueueAdapter> SlotContext<A> {
    async fn run_slot(&self, slot: usize, mut stop: watch::Receiver<bool>) -> AdapterResult<()> {
        debug!(slot = slot, "Worker slot started");

        loop {
            if *stop.borrow() {
                break;
            }

            // Polls are cancel safe; a stop request interrupts an idle wait
            let polled = tokio::select! {
                biased;
                _ = stop.changed() => break,
                polled = self.adapter.next_delivery(self.config.wait_timeout) => polled,
            };

            match polled {
                Ok(None) => {}
                Ok(Some(delivery)) => self.dispatch(slot, delivery).await?,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    self.counters.record_adapter_error();
                    warn!(slot = slot, error = %e, "Adapter receive failed, backing off");
                    tokio::select! {
                        _ = stop.changed() => break,
                        _ = tokio::time::sleep(self.config.wait_timeout) => {}
                    }
                }
            }
        }

        debug!(slot = slot, "Worker slot finished");
        Ok(())
    }

    #[instrument(
        skip(self, delivery),
        fields(
            correlation_id = %delivery.correlation_id,
            task_name = %delivery.task_name,
        )
    )]
    async fn dispatch(&self, slot: usize, delivery: Delivery) -> AdapterResult<()> {
        self.counters.record_received();

        let Some(handler) = self.registry.get(&delivery.task_name) else {
            self.counters.record_unregistered();
            error!(
                receipt = %delivery.receipt_handle,
                "No handler registered for task"
            );
            return self.settle(self.adapter.nack(&delivery, false).await);
        };

        let started = Instant::now();
        match self.execute(handler.as_ref(), &delivery).await {
            Ok(()) => {
                self.counters.record_succeeded();
                debug!(
                    handler = handler.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Task completed"
                );
                self.settle(self.adapter.ack(&delivery).await)
            }
            Err(handler_error) => {
                self.counters.record_failed();
                error!(
                    handler = handler.name(),
                    error = %handler_error,
                    error_kind = handler_error.kind(),
                    redelivered = delivery.redelivered,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Task failed"
                );
                let requeue = self.config.requeue_on_failure;
                self.settle(self.adapter.nack(&delivery, requeue).await)
            }
        }
    }

    /// Run the handler, converting panics and timeouts into handler errors
    async fn execute(&self, handler: &dyn TaskHandler, delivery: &Delivery) -> HandlerResult<()> {
        let call = AssertUnwindSafe(handler.execute(delivery)).catch_unwind();

        let outcome = match self.config.execute_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(HandlerError::Timeout { elapsed: limit }),
            },
            None => call.await,
        };

        outcome.unwrap_or_else(|panic| {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(HandlerError::Panicked { message })
        })
    }

    /// Count and log an ack/nack failure; only fatal ones stop the slot
    fn settle(&self, result: AdapterResult<()>) -> AdapterResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.counters.record_adapter_error();
                error!(error = %e, "Failed to settle delivery");
                Ok(())
            }
        }
    }
}
