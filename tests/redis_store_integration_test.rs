//! Redis event store against a live server
//!
//! Run with `REDIS_URL=redis://localhost:6379 cargo test -- --ignored`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics_worker::handlers::{DistinctNameHandler, TaskHandler, DISTINCT_NAME_TASK};
use metrics_worker::messaging::{Delivery, ReceiptHandle};
use metrics_worker::store::{EventStore, RedisEventStore, StoreError};
use uuid::Uuid;

fn redis_address() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "localhost:6379".to_string())
}

async fn raw_connection() -> redis::aio::MultiplexedConnection {
    let client = redis::Client::open(metrics_worker::store::redis_url(&redis_address())).unwrap();
    client.get_multiplexed_async_connection().await.unwrap()
}

fn unique(tag: &str) -> String {
    format!("mw-test-{tag}-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires Redis running"]
async fn test_ping_and_increment() {
    let store = RedisEventStore::connect(&redis_address()).await.unwrap();
    store.ping().await.unwrap();

    let key = unique("counter");
    assert_eq!(store.increment(&key).await.unwrap(), 1);
    assert_eq!(store.increment(&key).await.unwrap(), 2);

    let mut conn = raw_connection().await;
    let _: () = redis::cmd("DEL").arg(&key).query_async(&mut conn).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Redis running"]
async fn test_record_event_writes_hash_and_index() {
    let store = RedisEventStore::connect(&redis_address()).await.unwrap();
    let event_id = format!("{}:1", unique("metric"));
    let index = unique("index");
    let fields = vec![
        ("metric".to_string(), "click".to_string()),
        ("button".to_string(), "buy".to_string()),
    ];

    store
        .record_event(&event_id, &fields, &index, 1_700_000_000)
        .await
        .unwrap();

    let mut conn = raw_connection().await;
    let hash: HashMap<String, String> = redis::cmd("HGETALL")
        .arg(&event_id)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(hash["metric"], "click");
    assert_eq!(hash["button"], "buy");

    let score: i64 = redis::cmd("ZSCORE")
        .arg(&index)
        .arg(&event_id)
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(score, 1_700_000_000);

    let _: () = redis::cmd("DEL")
        .arg(&event_id)
        .arg(&index)
        .query_async(&mut conn)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires Redis running"]
async fn test_empty_record_rejected() {
    let store = RedisEventStore::connect(&redis_address()).await.unwrap();
    let result = store.record_event("empty:1", &[], "events", 0).await;
    assert!(matches!(result, Err(StoreError::Command { .. })));
}

#[tokio::test]
#[ignore = "requires Redis running"]
async fn test_handler_against_redis() {
    let store = Arc::new(RedisEventStore::connect(&redis_address()).await.unwrap());
    let handler = DistinctNameHandler::new(store);
    let metric = unique("handler");

    let payload = format!(r#"{{"metric":"{metric}"}}"#);
    let delivery = Delivery::new(
        DISTINCT_NAME_TASK,
        payload.into_bytes(),
        ReceiptHandle::from("redis-test"),
    );
    handler.execute(&delivery).await.unwrap();

    let mut conn = raw_connection().await;
    let counter: i64 = redis::cmd("GET")
        .arg(format!("idCounter:{metric}"))
        .query_async(&mut conn)
        .await
        .unwrap();
    assert_eq!(counter, 1);

    let score: Option<i64> = redis::cmd("ZSCORE")
        .arg("events")
        .arg(format!("{metric}:1"))
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(score.is_some());

    let _: () = redis::cmd("ZREM")
        .arg("events")
        .arg(format!("{metric}:1"))
        .query_async(&mut conn)
        .await
        .unwrap();
    let _: () = redis::cmd("DEL")
        .arg(format!("idCounter:{metric}"))
        .arg(format!("{metric}:1"))
        .query_async(&mut conn)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unreachable_redis_is_a_connection_error() {
    let result = tokio::time::timeout(
        Duration::from_secs(10),
        RedisEventStore::connect("127.0.0.1:1"),
    )
    .await
    .expect("connect should give up well before the deadline");
    assert!(matches!(result, Err(StoreError::Connection(_))));
}
