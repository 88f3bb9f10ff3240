//! Processor configuration

use std::time::Duration;

use super::errors::{ProcessorError, ProcessorResult};

pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(500);

/// Runtime settings of a [`TaskProcessor`](super::TaskProcessor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Number of worker slots, each handling one delivery at a time
    pub concurrency: usize,

    /// Upper bound on a single idle poll of the adapter
    pub wait_timeout: Duration,

    /// Requeue deliveries whose handler failed instead of dead-lettering them
    pub requeue_on_failure: bool,

    /// Optional deadline for one handler call
    pub execute_timeout: Option<Duration>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            requeue_on_failure: false,
            execute_timeout: None,
        }
    }
}

impl ProcessorConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn with_requeue_on_failure(mut self, requeue: bool) -> Self {
        self.requeue_on_failure = requeue;
        self
    }

    pub fn with_execute_timeout(mut self, execute_timeout: Option<Duration>) -> Self {
        self.execute_timeout = execute_timeout;
        self
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        if self.concurrency == 0 {
            return Err(ProcessorError::invalid_config(
                "concurrency",
                "must be at least 1",
            ));
        }
        if self.wait_timeout.is_zero() {
            return Err(ProcessorError::invalid_config(
                "wait_timeout",
                "must be greater than zero",
            ));
        }
        if self.execute_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ProcessorError::invalid_config(
                "execute_timeout",
                "must be greater than zero when set",
            ));
        }
        Ok(())
    }
}
