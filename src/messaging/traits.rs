//! # Queue Adapter Trait
//!
//! Transport-agnostic contract between the task processor and a message queue.

use std::time::Duration;

use async_trait::async_trait;

use super::delivery::Delivery;
use super::errors::AdapterResult;

/// Core queue adapter trait
///
/// Implementations own queuing and redelivery. The processor only asks for the
/// next delivery and reports the outcome through `ack` / `nack`; it never
/// buffers deliveries itself, so a poll that times out loses nothing.
///
/// Adapters are shared by every worker slot and must tolerate concurrent
/// calls.
#[async_trait]
pub trait QueueAdapter: Send + Sync + 'static {
    /// Establish the transport connection
    ///
    /// Called once by the processor before any slot starts. An error here is
    /// fatal to `start`.
    async fn connect(&self) -> AdapterResult<()>;

    /// Wait up to `wait_timeout` for the next delivery
    ///
    /// Returns `Ok(None)` when nothing arrived within the timeout.
    async fn next_delivery(&self, wait_timeout: Duration) -> AdapterResult<Option<Delivery>>;

    /// Acknowledge successful processing
    async fn ack(&self, delivery: &Delivery) -> AdapterResult<()>;

    /// Negative acknowledge
    ///
    /// With `requeue` the delivery returns to the queue; without it the
    /// transport dead-letters or discards it.
    async fn nack(&self, delivery: &Delivery, requeue: bool) -> AdapterResult<()>;

    /// Verify the transport is reachable
    async fn health_check(&self) -> AdapterResult<bool>;

    /// Adapter name for logging
    fn adapter_name(&self) -> &'static str;
}

#[async_trait]
impl<T: QueueAdapter + ?Sized> QueueAdapter for std::sync::Arc<T> {
    async fn connect(&self) -> AdapterResult<()> {
        (**self).connect().await
    }

    async fn next_delivery(&self, wait_timeout: Duration) -> AdapterResult<Option<Delivery>> {
        (**self).next_delivery(wait_timeout).await
    }

    async fn ack(&self, delivery: &Delivery) -> AdapterResult<()> {
        (**self).ack(delivery).await
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> AdapterResult<()> {
        (**self).nack(delivery, requeue).await
    }

    async fn health_check(&self) -> AdapterResult<bool> {
        (**self).health_check().await
    }

    fn adapter_name(&self) -> &'static str {
        (**self).adapter_name()
    }
}
