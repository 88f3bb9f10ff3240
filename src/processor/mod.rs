//! # Task Processor
//!
//! Concurrent dispatch of queue deliveries to registered task handlers.

pub mod config;
pub mod errors;
pub mod scheduler;
pub mod stats;

pub use config::ProcessorConfig;
pub use errors::{ProcessorError, ProcessorResult};
pub use scheduler::{ShutdownHandle, StatsHandle, TaskProcessor};
pub use stats::ProcessorStats;
