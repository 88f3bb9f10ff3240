//! Adapters with scripted failures

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_worker::messaging::{
    AdapterError, AdapterResult, Delivery, InMemoryAdapter, QueueAdapter,
};
use parking_lot::Mutex;

/// Wraps an in-memory queue and fails polls from a script before delegating
pub struct ScriptedAdapter {
    pub inner: Arc<InMemoryAdapter>,
    poll_failures: Mutex<VecDeque<AdapterError>>,
    connect_failure: Mutex<Option<AdapterError>>,
}

impl ScriptedAdapter {
    pub fn new(inner: Arc<InMemoryAdapter>) -> Self {
        Self {
            inner,
            poll_failures: Mutex::new(VecDeque::new()),
            connect_failure: Mutex::new(None),
        }
    }

    /// Queue an error to be returned by the next poll
    pub fn fail_next_poll(&self, error: AdapterError) {
        self.poll_failures.lock().push_back(error);
    }

    pub fn fail_connect(&self, error: AdapterError) {
        *self.connect_failure.lock() = Some(error);
    }
}

#[async_trait]
impl QueueAdapter for ScriptedAdapter {
    async fn connect(&self) -> AdapterResult<()> {
        if let Some(error) = self.connect_failure.lock().take() {
            return Err(error);
        }
        self.inner.connect().await
    }

    async fn next_delivery(&self, wait_timeout: Duration) -> AdapterResult<Option<Delivery>> {
        let scripted = self.poll_failures.lock().pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }
        self.inner.next_delivery(wait_timeout).await
    }

    async fn ack(&self, delivery: &Delivery) -> AdapterResult<()> {
        self.inner.ack(delivery).await
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> AdapterResult<()> {
        self.inner.nack(delivery, requeue).await
    }

    async fn health_check(&self) -> AdapterResult<bool> {
        self.inner.health_check().await
    }

    fn adapter_name(&self) -> &'static str {
        "scripted"
    }
}
