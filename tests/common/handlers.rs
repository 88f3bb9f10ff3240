//! Test task handlers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use metrics_worker::handlers::{HandlerError, HandlerResult, TaskHandler};
use metrics_worker::messaging::Delivery;
use parking_lot::Mutex;

/// Records payloads in the order they were executed
#[derive(Default)]
pub struct RecordingHandler {
    seen: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl TaskHandler for RecordingHandler {
    async fn execute(&self, delivery: &Delivery) -> HandlerResult<()> {
        self.seen.lock().push(delivery.payload_lossy());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub struct PanickingHandler;

#[async_trait]
impl TaskHandler for PanickingHandler {
    async fn execute(&self, _delivery: &Delivery) -> HandlerResult<()> {
        panic!("handler exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

pub struct SlowHandler(pub Duration);

#[async_trait]
impl TaskHandler for SlowHandler {
    async fn execute(&self, _delivery: &Delivery) -> HandlerResult<()> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Fails the first `failures` calls, then succeeds
pub struct FlakyHandler {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyHandler {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskHandler for FlakyHandler {
    async fn execute(&self, _delivery: &Delivery) -> HandlerResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(HandlerError::decode("transient failure", "{}"))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "flaky"
    }
}
