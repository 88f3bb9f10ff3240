//! Task handler trait

use async_trait::async_trait;

use super::errors::HandlerResult;
use crate::messaging::Delivery;

/// A unit of business logic bound to a task name
///
/// Handlers are shared across worker slots behind an `Arc` and may run
/// concurrently with themselves.
#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    /// Process one delivery
    ///
    /// The delivery is borrowed; acknowledgement stays with the processor.
    async fn execute(&self, delivery: &Delivery) -> HandlerResult<()>;

    /// Handler identifier for logging
    fn name(&self) -> &str;
}
