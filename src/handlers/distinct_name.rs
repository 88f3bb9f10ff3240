//! # Distinct-Name Handler
//!
//! Assigns every incoming metric a per-name sequence number and records the
//! event under `<metric>:<sequence>`, indexed by ingestion time.
//!
//! The counter increment and the record/index write are separate round trips.
//! A failure between them leaves an unused sequence number; sequence values
//! are never reused.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use super::count_metric::{CountMetric, EventId};
use super::errors::{HandlerError, HandlerResult};
use super::traits::TaskHandler;
use crate::messaging::Delivery;
use crate::store::EventStore;

/// Task name the handler is registered under
pub const DISTINCT_NAME_TASK: &str = "distinctName";

/// Sorted set holding every event id scored by ingestion time
pub const EVENTS_INDEX: &str = "events";

pub struct DistinctNameHandler<S> {
    store: Arc<S>,
}

impl<S> std::fmt::Debug for DistinctNameHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistinctNameHandler").finish_non_exhaustive()
    }
}

impl<S: EventStore> DistinctNameHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

/// Accept deliveries without a content type or with a JSON one
/// (`application/json`, `*/*+json`, parameters ignored)
fn check_envelope(content_type: Option<&str>) -> HandlerResult<()> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Ok(())
    } else {
        Err(HandlerError::envelope(content_type))
    }
}

#[async_trait]
impl<S: EventStore> TaskHandler for DistinctNameHandler<S> {
    #[instrument(
        skip(self, delivery),
        fields(correlation_id = %delivery.correlation_id, metric, event_id)
    )]
    async fn execute(&self, delivery: &Delivery) -> HandlerResult<()> {
        check_envelope(delivery.content_type.as_deref())?;

        let metric = CountMetric::from_slice(&delivery.payload)?;
        tracing::Span::current().record("metric", metric.metric());

        let sequence = self
            .store
            .increment(&metric.counter_key())
            .await
            .map_err(|e| HandlerError::store(metric.metric(), e))?;

        let event_id = EventId::new(metric.metric(), sequence).to_string();
        tracing::Span::current().record("event_id", event_id.as_str());

        let score = Utc::now().timestamp();
        self.store
            .record_event(&event_id, &metric.record_fields(), EVENTS_INDEX, score)
            .await
            .map_err(|e| HandlerError::store(metric.metric(), e))?;

        debug!(score = score, "Distinct event recorded");
        Ok(())
    }

    fn name(&self) -> &str {
        DISTINCT_NAME_TASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::ReceiptHandle;
    use crate::store::InMemoryEventStore;

    fn delivery(payload: &str) -> Delivery {
        Delivery::new(
            DISTINCT_NAME_TASK,
            payload.as_bytes().to_vec(),
            ReceiptHandle::from(1_u64),
        )
    }

    #[test]
    fn test_check_envelope() {
        assert!(check_envelope(None).is_ok());
        assert!(check_envelope(Some("application/json")).is_ok());
        assert!(check_envelope(Some("Application/JSON; charset=utf-8")).is_ok());
        assert!(check_envelope(Some("application/vnd.metrics+json")).is_ok());
        assert!(matches!(
            check_envelope(Some("text/plain")),
            Err(HandlerError::Envelope { .. })
        ));
    }

    #[tokio::test]
    async fn test_records_event_and_index() {
        let store = Arc::new(InMemoryEventStore::new());
        let handler = DistinctNameHandler::new(store.clone());

        let before = Utc::now().timestamp();
        handler
            .execute(&delivery(r#"{"metric":"click","button":"buy"}"#))
            .await
            .unwrap();
        let after = Utc::now().timestamp();

        let record = store.record("click:1").unwrap();
        assert_eq!(record["metric"], "click");
        assert_eq!(record["button"], "buy");

        let index = store.index_entries(EVENTS_INDEX);
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].0, "click:1");
        assert!(index[0].1 >= before && index[0].1 <= after);
    }

    #[tokio::test]
    async fn test_rejected_envelope_writes_nothing() {
        let store = Arc::new(InMemoryEventStore::new());
        let handler = DistinctNameHandler::new(store.clone());

        let d = delivery(r#"{"metric":"click"}"#).with_content_type("text/csv");
        assert!(matches!(
            handler.execute(&d).await,
            Err(HandlerError::Envelope { .. })
        ));
        assert_eq!(store.counter("idCounter:click"), None);
    }

    #[tokio::test]
    async fn test_increment_failure_is_store_error() {
        let store = Arc::new(InMemoryEventStore::new());
        store.fail_increments(true);
        let handler = DistinctNameHandler::new(store.clone());

        let err = handler
            .execute(&delivery(r#"{"metric":"click"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::Store { ref metric, .. } if metric == "click"));
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_sequence_gap() {
        let store = Arc::new(InMemoryEventStore::new());
        let handler = DistinctNameHandler::new(store.clone());

        store.fail_writes(true);
        assert!(handler
            .execute(&delivery(r#"{"metric":"gap"}"#))
            .await
            .is_err());
        assert_eq!(store.counter("idCounter:gap"), Some(1));

        store.fail_writes(false);
        handler
            .execute(&delivery(r#"{"metric":"gap"}"#))
            .await
            .unwrap();
        assert!(store.record("gap:1").is_none());
        assert!(store.record("gap:2").is_some());
    }
}
