//! # Queue Adapter Providers
//!
//! Concrete implementations of the [`QueueAdapter`](super::QueueAdapter) trait.
//!
//! ## Providers
//!
//! - [`RabbitMqAdapter`] - RabbitMQ via lapin crate
//! - [`InMemoryAdapter`] - Thread-safe in-process queue for tests and local runs

pub mod in_memory;
pub mod rabbitmq;

pub use in_memory::{InMemoryAdapter, InMemoryQueueStats};
pub use rabbitmq::{RabbitMqAdapter, RabbitMqSettings, RabbitMqStats};
