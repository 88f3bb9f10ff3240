//! In-memory event store
//!
//! Backs counters, records and indexes with sharded `DashMap`s. Counter
//! increments hold the shard entry lock, so concurrent callers always see
//! distinct values. Failure injection switches let tests exercise the
//! store-error paths of handlers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::traits::EventStore;

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    counters: DashMap<String, i64>,
    records: DashMap<String, HashMap<String, String>>,
    indexes: DashMap<String, HashMap<String, i64>>,
    fail_increments: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `increment` fail until switched off
    pub fn fail_increments(&self, fail: bool) {
        self.fail_increments.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `record_event` fail until switched off
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current counter value, if the key was ever incremented
    pub fn counter(&self, key: &str) -> Option<i64> {
        self.counters.get(key).map(|v| *v)
    }

    /// Stored event record
    pub fn record(&self, event_id: &str) -> Option<HashMap<String, String>> {
        self.records.get(event_id).map(|r| r.clone())
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Members of the sorted set `index_key` ordered by score, then member
    pub fn index_entries(&self, index_key: &str) -> Vec<(String, i64)> {
        let mut entries: Vec<(String, i64)> = self
            .indexes
            .get(index_key)
            .map(|index| index.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

impl EventStore for InMemoryEventStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(StoreError::command("INCR", key, "injected failure"));
        }

        let mut entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn record_event(
        &self,
        event_id: &str,
        fields: &[(String, String)],
        index_key: &str,
        score: i64,
    ) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::pipeline(event_id, "injected failure"));
        }

        self.records
            .entry(event_id.to_string())
            .or_default()
            .extend(fields.iter().cloned());
        self.indexes
            .entry(index_key.to_string())
            .or_default()
            .insert(event_id.to_string(), score);

        debug!(event_id = event_id, index = index_key, score = score, "Event recorded");
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
