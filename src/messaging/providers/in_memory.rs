//! # In-Memory Queue Adapter
//!
//! Thread-safe in-process queue for testing and local development.
//!
//! ## Features
//!
//! - **FIFO**: deliveries are handed out in publish order
//! - **Ack/Nack**: in-flight tracking with requeue and dead-letter semantics
//! - **Idle Wait**: `next_delivery` parks on a `Notify` until a publish or the timeout
//! - **Close**: simulates a lost transport so fatal-error paths can be exercised

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

use crate::config::ConfigResult;
use crate::messaging::delivery::{Delivery, ReceiptHandle};
use crate::messaging::errors::{AdapterError, AdapterResult};
use crate::messaging::schema::{AdapterConfig, AdapterProperty, AdapterSchema};
use crate::messaging::traits::QueueAdapter;

pub const ADAPTER_NAME: &str = "memory";

/// Configuration schema for the in-memory adapter
pub fn schema() -> AdapterSchema {
    AdapterSchema::new(
        ADAPTER_NAME,
        vec![
            AdapterProperty::string("queue-name", "tasks", "Name of the in-process queue"),
            AdapterProperty::int(
                "capacity",
                10_000,
                "Maximum pending deliveries (0 for unbounded)",
            ),
        ],
    )
}

#[derive(Debug, Clone)]
struct StoredMessage {
    id: u64,
    task_name: String,
    payload: Vec<u8>,
    content_type: Option<String>,
    receive_count: u32,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<StoredMessage>,
    in_flight: HashMap<u64, StoredMessage>,
    dead_letters: Vec<StoredMessage>,
    closed: bool,
}

/// Counters exposed for assertions and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemoryQueueStats {
    pub total_sent: u64,
    pub total_received: u64,
    pub total_acked: u64,
    pub total_nacked: u64,
}

/// In-process queue adapter
#[derive(Debug)]
pub struct InMemoryAdapter {
    queue_name: String,
    /// 0 means unbounded
    capacity: usize,
    state: Mutex<QueueState>,
    notify: Notify,
    next_id: AtomicU64,
    connected: AtomicBool,
    total_sent: AtomicU64,
    total_received: AtomicU64,
    total_acked: AtomicU64,
    total_nacked: AtomicU64,
}

impl Default for InMemoryAdapter {
    fn default() -> Self {
        Self::new("tasks")
    }
}

impl InMemoryAdapter {
    /// Create an unbounded queue
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self::with_capacity(queue_name, 0)
    }

    /// Create a queue that rejects publishes beyond `capacity` pending deliveries
    pub fn with_capacity(queue_name: impl Into<String>, capacity: usize) -> Self {
        Self {
            queue_name: queue_name.into(),
            capacity,
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
            next_id: AtomicU64::new(1),
            connected: AtomicBool::new(false),
            total_sent: AtomicU64::new(0),
            total_received: AtomicU64::new(0),
            total_acked: AtomicU64::new(0),
            total_nacked: AtomicU64::new(0),
        }
    }

    /// Build from a validated adapter configuration
    pub fn from_config(config: &AdapterConfig) -> ConfigResult<Self> {
        let queue_name = config.get_string("queue-name")?;
        let capacity = config.get_int("capacity")?;
        let capacity = usize::try_from(capacity).map_err(|_| {
            crate::config::ConfigurationError::invalid_value(
                "memory-capacity",
                capacity.to_string(),
                "must not be negative",
            )
        })?;
        Ok(Self::with_capacity(queue_name, capacity))
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Publish a JSON payload for `task_name`
    pub fn publish(&self, task_name: &str, payload: impl Into<Vec<u8>>) -> AdapterResult<u64> {
        self.publish_raw(task_name, payload, Some("application/json"))
    }

    /// Publish a serializable value as JSON for `task_name`
    pub fn publish_json<T: serde::Serialize>(
        &self,
        task_name: &str,
        value: &T,
    ) -> AdapterResult<u64> {
        let payload = serde_json::to_vec(value)
            .map_err(|e| AdapterError::configuration(ADAPTER_NAME, e.to_string()))?;
        self.publish(task_name, payload)
    }

    /// Publish with an explicit (or absent) content type
    pub fn publish_raw(
        &self,
        task_name: &str,
        payload: impl Into<Vec<u8>>,
        content_type: Option<&str>,
    ) -> AdapterResult<u64> {
        let id = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(AdapterError::disconnected(format!(
                    "queue {} is closed",
                    self.queue_name
                )));
            }
            if self.capacity > 0 && state.pending.len() >= self.capacity {
                return Err(AdapterError::QueueFull {
                    queue_name: self.queue_name.clone(),
                    capacity: self.capacity,
                });
            }

            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            state.pending.push_back(StoredMessage {
                id,
                task_name: task_name.to_string(),
                payload: payload.into(),
                content_type: content_type.map(str::to_string),
                receive_count: 0,
            });
            id
        };

        self.total_sent.fetch_add(1, Ordering::Relaxed);
        self.notify.notify_one();
        Ok(id)
    }

    /// Close the queue; subsequent polls fail with a fatal disconnect
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_waiters();
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    pub fn dead_letter_count(&self) -> usize {
        self.state.lock().dead_letters.len()
    }

    /// Task names of dead-lettered deliveries, in the order they were rejected
    pub fn dead_letter_tasks(&self) -> Vec<String> {
        self.state
            .lock()
            .dead_letters
            .iter()
            .map(|m| m.task_name.clone())
            .collect()
    }

    pub fn stats(&self) -> InMemoryQueueStats {
        InMemoryQueueStats {
            total_sent: self.total_sent.load(Ordering::Relaxed),
            total_received: self.total_received.load(Ordering::Relaxed),
            total_acked: self.total_acked.load(Ordering::Relaxed),
            total_nacked: self.total_nacked.load(Ordering::Relaxed),
        }
    }

    fn try_take(&self) -> AdapterResult<Option<Delivery>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(AdapterError::disconnected(format!(
                "queue {} is closed",
                self.queue_name
            )));
        }

        let Some(mut message) = state.pending.pop_front() else {
            return Ok(None);
        };
        message.receive_count += 1;

        let mut delivery = Delivery::new(
            message.task_name.clone(),
            message.payload.clone(),
            ReceiptHandle::from(message.id),
        )
        .with_redelivered(message.receive_count > 1);
        delivery.content_type = message.content_type.clone();

        state.in_flight.insert(message.id, message);
        self.total_received.fetch_add(1, Ordering::Relaxed);
        Ok(Some(delivery))
    }

    fn settle(&self, delivery: &Delivery) -> AdapterResult<StoredMessage> {
        let id = delivery
            .receipt_handle
            .as_u64()
            .ok_or_else(|| AdapterError::invalid_receipt_handle(delivery.receipt_handle.as_str()))?;

        self.state
            .lock()
            .in_flight
            .remove(&id)
            .ok_or_else(|| AdapterError::invalid_receipt_handle(delivery.receipt_handle.as_str()))
    }
}

#[async_trait]
impl QueueAdapter for InMemoryAdapter {
    async fn connect(&self) -> AdapterResult<()> {
        if self.state.lock().closed {
            return Err(AdapterError::connection(format!(
                "queue {} is closed",
                self.queue_name
            )));
        }
        self.connected.store(true, Ordering::Release);
        debug!(queue = %self.queue_name, "In-memory adapter connected");
        Ok(())
    }

    async fn next_delivery(&self, wait_timeout: Duration) -> AdapterResult<Option<Delivery>> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(AdapterError::not_connected(ADAPTER_NAME));
        }

        let deadline = Instant::now() + wait_timeout;
        loop {
            if let Some(delivery) = self.try_take()? {
                return Ok(Some(delivery));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            // notify_one stores a permit when nobody is waiting, so a publish
            // between try_take and here is not lost
            if tokio::time::timeout(remaining, self.notify.notified())
                .await
                .is_err()
            {
                return self.try_take();
            }
        }
    }

    async fn ack(&self, delivery: &Delivery) -> AdapterResult<()> {
        self.settle(delivery)?;
        self.total_acked.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> AdapterResult<()> {
        let message = self.settle(delivery)?;
        self.total_nacked.fetch_add(1, Ordering::Relaxed);

        {
            let mut state = self.state.lock();
            if requeue {
                state.pending.push_front(message);
            } else {
                state.dead_letters.push(message);
            }
        }
        if requeue {
            self.notify.notify_one();
        }
        Ok(())
    }

    async fn health_check(&self) -> AdapterResult<bool> {
        Ok(self.connected.load(Ordering::Acquire) && !self.state.lock().closed)
    }

    fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }
}
