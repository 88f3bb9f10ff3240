#![allow(dead_code)]
#![allow(unused_imports)]

pub mod adapters;
pub mod handlers;
pub mod strategies;

use std::sync::Arc;
use std::time::Duration;

use metrics_worker::messaging::QueueAdapter;
use metrics_worker::processor::{
    ProcessorConfig, ProcessorResult, ProcessorStats, ShutdownHandle, TaskProcessor,
};
use tokio::task::JoinHandle;

pub use adapters::*;
pub use handlers::*;

/// Processor settings with a short idle wait so tests stay fast
pub fn fast_config(concurrency: usize) -> ProcessorConfig {
    ProcessorConfig::default()
        .with_concurrency(concurrency)
        .with_wait_timeout(Duration::from_millis(20))
}

/// Start the processor in the background
pub fn spawn_processor<A: QueueAdapter>(
    processor: TaskProcessor<A>,
) -> (ShutdownHandle, JoinHandle<ProcessorResult<ProcessorStats>>) {
    let shutdown = processor.shutdown_handle();
    let running = tokio::spawn(processor.start());
    (shutdown, running)
}

/// Poll `condition` until it holds or `timeout` elapses
pub async fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Request shutdown and collect the final statistics
pub async fn stop(
    shutdown: ShutdownHandle,
    running: JoinHandle<ProcessorResult<ProcessorStats>>,
) -> ProcessorStats {
    shutdown.shutdown();
    tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("processor should stop promptly")
        .expect("processor task should not panic")
        .expect("processor should stop cleanly")
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
