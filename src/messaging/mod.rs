//! # Messaging Module
//!
//! Queue adapter boundary: the [`QueueAdapter`] trait, the [`Delivery`] it
//! yields, typed adapter configuration schemas and the built-in providers.

pub mod delivery;
pub mod errors;
pub mod factory;
pub mod provider;
pub mod providers;
pub mod schema;
pub mod traits;

pub use delivery::{Delivery, ReceiptHandle};
pub use errors::{AdapterError, AdapterResult};
pub use factory::{adapter_factory, adapter_schema, known_adapters, AdapterFactory};
pub use provider::QueueAdapterProvider;
pub use providers::{InMemoryAdapter, RabbitMqAdapter};
pub use schema::{AdapterConfig, AdapterProperty, AdapterSchema, PropertyKind, PropertyValue};
pub use traits::QueueAdapter;
