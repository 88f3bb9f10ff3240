//! Processor statistics

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of processor counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// Deliveries handed out by the adapter
    pub received: u64,
    /// Handler returned `Ok` and the delivery was acked
    pub succeeded: u64,
    /// Handler returned an error, panicked or timed out
    pub failed: u64,
    /// No handler registered for the task name
    pub unregistered: u64,
    /// Non-fatal adapter errors (receive, ack, nack)
    pub adapter_errors: u64,
}

impl ProcessorStats {
    /// Deliveries that reached a final outcome
    pub fn processed(&self) -> u64 {
        self.succeeded + self.failed + self.unregistered
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    received: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    unregistered: AtomicU64,
    adapter_errors: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unregistered(&self) {
        self.unregistered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_adapter_error(&self) {
        self.adapter_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ProcessorStats {
        ProcessorStats {
            received: self.received.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            unregistered: self.unregistered.load(Ordering::Relaxed),
            adapter_errors: self.adapter_errors.load(Ordering::Relaxed),
        }
    }
}
