//! Proptest strategies for metric payloads

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Metric names as seen in practice, including namespaced ones with colons
pub fn metric_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}(:[a-z0-9_]{1,8}){0,2}"
}

/// Scalar and nested JSON values for extra payload fields
pub fn field_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// A valid metric payload: `metric` plus up to five extra fields
pub fn payload_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        metric_name_strategy(),
        prop::collection::btree_map("[a-z]{1,10}", field_value_strategy(), 0..5),
    )
        .prop_map(|(metric, extra)| {
            let mut payload: Map<String, Value> = extra
                .into_iter()
                .filter(|(name, _)| name != "metric")
                .collect();
            payload.insert("metric".to_string(), Value::String(metric));
            payload
        })
}
