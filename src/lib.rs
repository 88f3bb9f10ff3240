#![allow(clippy::doc_markdown)] // Allow technical terms like RabbitMQ, ZADD in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Metrics Worker
//!
//! Queue-driven task processor that records count metrics as sequenced,
//! time-indexed events.
//!
//! ## Overview
//!
//! A pool of worker slots pulls deliveries from a pluggable queue adapter,
//! routes each one by task name to a registered handler and acknowledges the
//! outcome. The built-in `distinctName` handler gives every metric a
//! per-name sequence number from a Redis counter and writes the event as a
//! hash plus an entry in the `events` sorted set scored by ingestion time.
//!
//! ## Module Organization
//!
//! - [`messaging`] - Queue adapter trait, deliveries, adapter schemas and providers
//! - [`registry`] - Task name to handler lookup
//! - [`processor`] - Concurrent dispatch engine
//! - [`handlers`] - Task handler trait and the distinct-name handler
//! - [`store`] - Counter, record and index storage (Redis, in-memory)
//! - [`config`] - Layered worker configuration
//! - [`cli`] - Command line options, including generated adapter options
//! - [`bootstrap`] - Wiring for the worker binary
//! - [`logging`] - Console tracing setup
//! - [`error`] - Top-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use metrics_worker::handlers::{DistinctNameHandler, DISTINCT_NAME_TASK};
//! use metrics_worker::messaging::InMemoryAdapter;
//! use metrics_worker::processor::{ProcessorConfig, TaskProcessor};
//! use metrics_worker::store::InMemoryEventStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = Arc::new(InMemoryAdapter::new("tasks"));
//! let store = Arc::new(InMemoryEventStore::new());
//!
//! let mut processor = TaskProcessor::new(adapter.clone(), ProcessorConfig::default())?;
//! processor.register(DISTINCT_NAME_TASK, Arc::new(DistinctNameHandler::new(store.clone())))?;
//!
//! adapter.publish(DISTINCT_NAME_TASK, br#"{"metric":"pageview"}"#.to_vec())?;
//!
//! let shutdown = processor.shutdown_handle();
//! let running = tokio::spawn(processor.start());
//! // ... later
//! shutdown.shutdown();
//! let stats = running.await??;
//! println!("processed {}", stats.processed());
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod messaging;
pub mod processor;
pub mod registry;
pub mod store;

pub use error::{Result, WorkerError};
