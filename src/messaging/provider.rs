//! # Queue Adapter Provider Enum
//!
//! Enum dispatch over the built-in adapters, avoiding trait object overhead.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::delivery::Delivery;
use super::errors::AdapterResult;
use super::providers::{InMemoryAdapter, RabbitMqAdapter};
use super::traits::QueueAdapter;

/// Provider enum returned by the adapter factory
///
/// The processor is generic over [`QueueAdapter`]; this enum lets the binary
/// pick an adapter at runtime without boxing.
///
/// The in-memory variant holds an `Arc` so a test can keep publishing into the
/// queue after handing the provider to a processor.
#[derive(Debug)]
pub enum QueueAdapterProvider {
    /// RabbitMQ (AMQP 0.9.1) via lapin
    RabbitMq(RabbitMqAdapter),

    /// In-process queue
    InMemory(Arc<InMemoryAdapter>),
}

impl QueueAdapterProvider {
    /// Access the in-memory adapter, if that is the active variant
    pub fn as_in_memory(&self) -> Option<&Arc<InMemoryAdapter>> {
        match self {
            Self::InMemory(adapter) => Some(adapter),
            Self::RabbitMq(_) => None,
        }
    }
}

#[async_trait]
impl QueueAdapter for QueueAdapterProvider {
    async fn connect(&self) -> AdapterResult<()> {
        match self {
            Self::RabbitMq(a) => a.connect().await,
            Self::InMemory(a) => a.connect().await,
        }
    }

    async fn next_delivery(&self, wait_timeout: Duration) -> AdapterResult<Option<Delivery>> {
        match self {
            Self::RabbitMq(a) => a.next_delivery(wait_timeout).await,
            Self::InMemory(a) => a.next_delivery(wait_timeout).await,
        }
    }

    async fn ack(&self, delivery: &Delivery) -> AdapterResult<()> {
        match self {
            Self::RabbitMq(a) => a.ack(delivery).await,
            Self::InMemory(a) => a.ack(delivery).await,
        }
    }

    async fn nack(&self, delivery: &Delivery, requeue: bool) -> AdapterResult<()> {
        match self {
            Self::RabbitMq(a) => a.nack(delivery, requeue).await,
            Self::InMemory(a) => a.nack(delivery, requeue).await,
        }
    }

    async fn health_check(&self) -> AdapterResult<bool> {
        match self {
            Self::RabbitMq(a) => a.health_check().await,
            Self::InMemory(a) => a.health_check().await,
        }
    }

    fn adapter_name(&self) -> &'static str {
        match self {
            Self::RabbitMq(a) => a.adapter_name(),
            Self::InMemory(a) => a.adapter_name(),
        }
    }
}
