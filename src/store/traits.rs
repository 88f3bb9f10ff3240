//! Event store trait definition

use super::errors::StoreResult;

/// Counter, hash and sorted-set operations needed to record events
///
/// Implemented by [`RedisEventStore`](super::RedisEventStore) and
/// [`InMemoryEventStore`](super::InMemoryEventStore).
pub trait EventStore: Send + Sync + 'static {
    /// Liveness probe, used once before the processor starts
    fn ping(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Atomically increment the integer at `key` and return the new value
    ///
    /// A missing key counts from zero, so the first call returns 1.
    fn increment(&self, key: &str) -> impl std::future::Future<Output = StoreResult<i64>> + Send;

    /// Write the event hash and its index entry in one round trip
    ///
    /// Stores `fields` as a hash under `event_id` and adds `event_id` to the
    /// sorted set `index_key` with `score`. The two writes are sent together
    /// but are not transactional.
    fn record_event(
        &self,
        event_id: &str,
        fields: &[(String, String)],
        index_key: &str,
        score: i64,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Name of the backend for logging
    fn store_name(&self) -> &'static str;
}
