//! Property tests for metric decoding and event identifiers

mod common;

use common::strategies::{field_value_strategy, metric_name_strategy, payload_strategy};
use metrics_worker::handlers::count_metric::field_value;
use metrics_worker::handlers::{CountMetric, EventId};
use proptest::prelude::*;
use serde_json::Value;

proptest! {
    #[test]
    fn prop_event_id_parses_back(metric in metric_name_strategy(), sequence in 1i64..i64::MAX) {
        let id = EventId::new(metric.clone(), sequence);
        let parsed = EventId::parse(&id.to_string()).unwrap();
        prop_assert_eq!(parsed.metric(), metric.as_str());
        prop_assert_eq!(parsed.sequence(), sequence);
    }

    #[test]
    fn prop_valid_payload_keeps_every_field(payload in payload_strategy()) {
        let bytes = serde_json::to_vec(&Value::Object(payload.clone())).unwrap();
        let decoded = CountMetric::from_slice(&bytes).unwrap();

        prop_assert_eq!(decoded.metric(), payload["metric"].as_str().unwrap());
        prop_assert_eq!(decoded.counter_key(), format!("idCounter:{}", decoded.metric()));

        let fields = decoded.record_fields();
        prop_assert_eq!(fields.len(), payload.len());
        for (name, value) in fields {
            prop_assert_eq!(value, field_value(&payload[&name]));
        }
    }

    #[test]
    fn prop_payload_without_metric_rejected(value in field_value_strategy()) {
        let mut object = serde_json::Map::new();
        object.insert("value".to_string(), value);
        let bytes = serde_json::to_vec(&Value::Object(object)).unwrap();
        prop_assert!(CountMetric::from_slice(&bytes).is_err());
    }

    #[test]
    fn prop_non_string_json_fields_are_reparseable(value in field_value_strategy()) {
        let stored = field_value(&value);
        match &value {
            Value::String(s) => prop_assert_eq!(&stored, s),
            Value::Null => prop_assert!(stored.is_empty()),
            other => {
                let reparsed: Value = serde_json::from_str(&stored).unwrap();
                prop_assert_eq!(&reparsed, other);
            }
        }
    }
}
