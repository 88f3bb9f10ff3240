//! # Adapter Factory
//!
//! Resolves an adapter by name, publishes its configuration schema and
//! constructs it from a validated [`AdapterConfig`].

use std::sync::Arc;

use super::errors::{AdapterError, AdapterResult};
use super::provider::QueueAdapterProvider;
use super::providers::{in_memory, rabbitmq, InMemoryAdapter, RabbitMqAdapter};
use super::schema::{AdapterConfig, AdapterSchema};

/// Built-in adapter kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFactory {
    RabbitMq,
    InMemory,
}

impl AdapterFactory {
    /// Adapter name as used on the command line and in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::RabbitMq => rabbitmq::ADAPTER_NAME,
            Self::InMemory => in_memory::ADAPTER_NAME,
        }
    }

    /// Properties the adapter accepts
    pub fn schema(&self) -> AdapterSchema {
        match self {
            Self::RabbitMq => rabbitmq::schema(),
            Self::InMemory => in_memory::schema(),
        }
    }

    /// Construct the adapter; no connection is made until `connect`
    pub fn create(&self, config: &AdapterConfig) -> AdapterResult<QueueAdapterProvider> {
        if config.adapter() != self.name() {
            return Err(AdapterError::configuration(
                self.name(),
                format!("configuration belongs to adapter '{}'", config.adapter()),
            ));
        }

        match self {
            Self::RabbitMq => RabbitMqAdapter::from_config(config)
                .map(QueueAdapterProvider::RabbitMq)
                .map_err(|e| AdapterError::configuration(self.name(), e.to_string())),
            Self::InMemory => InMemoryAdapter::from_config(config)
                .map(|adapter| QueueAdapterProvider::InMemory(Arc::new(adapter)))
                .map_err(|e| AdapterError::configuration(self.name(), e.to_string())),
        }
    }
}

/// Every adapter this build knows about
pub fn known_adapters() -> &'static [AdapterFactory] {
    &[AdapterFactory::RabbitMq, AdapterFactory::InMemory]
}

/// Look up an adapter factory by name
pub fn adapter_factory(name: &str) -> AdapterResult<AdapterFactory> {
    known_adapters()
        .iter()
        .copied()
        .find(|factory| factory.name() == name)
        .ok_or_else(|| AdapterError::unknown_adapter(name))
}

/// Schema of the named adapter
pub fn adapter_schema(name: &str) -> AdapterResult<AdapterSchema> {
    adapter_factory(name).map(|factory| factory.schema())
}
