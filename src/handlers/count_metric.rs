//! # Count Metric Payload
//!
//! Decoding of the JSON object consumed by the distinct-name handler and the
//! identifiers derived from it.

use std::fmt;

use serde_json::{Map, Value};

use super::errors::{HandlerError, HandlerResult};

/// Prefix of per-metric sequence counters
pub const COUNTER_PREFIX: &str = "idCounter";

/// Field that names the metric
pub const METRIC_FIELD: &str = "metric";

/// A decoded metric payload
///
/// Holds every field of the incoming JSON object; `metric` is guaranteed to
/// be a non-empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMetric {
    metric: String,
    fields: Map<String, Value>,
}

impl CountMetric {
    /// Decode a payload, reporting the raw text on failure
    pub fn from_slice(payload: &[u8]) -> HandlerResult<Self> {
        let lossy = || String::from_utf8_lossy(payload).into_owned();

        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| HandlerError::decode(e.to_string(), lossy()))?;

        Self::from_value(value).map_err(|reason| HandlerError::decode(reason, lossy()))
    }

    /// Build from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err("payload is not a JSON object".to_string());
        };

        let metric = match fields.get(METRIC_FIELD) {
            None => return Err(format!("missing field `{METRIC_FIELD}`")),
            Some(Value::String(s)) if s.is_empty() => {
                return Err(format!("field `{METRIC_FIELD}` must not be empty"))
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(format!(
                    "field `{METRIC_FIELD}` must be a string, found {}",
                    json_type(other)
                ))
            }
        };

        Ok(Self { metric, fields })
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Key of the sequence counter for this metric (`idCounter:<metric>`)
    pub fn counter_key(&self) -> String {
        format!("{COUNTER_PREFIX}:{}", self.metric)
    }

    /// Fields flattened to string pairs for storage as a hash
    ///
    /// Strings are kept verbatim, `null` becomes the empty string and every
    /// other value is written as compact JSON.
    pub fn record_fields(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), field_value(value)))
            .collect()
    }
}

/// String form of a JSON value as stored in an event record
pub fn field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Identifier of one recorded event: `<metric>:<sequence>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    metric: String,
    sequence: i64,
}

impl EventId {
    pub fn new(metric: impl Into<String>, sequence: i64) -> Self {
        Self {
            metric: metric.into(),
            sequence,
        }
    }

    /// Parse `<metric>:<sequence>`, splitting on the last colon
    ///
    /// Metric names may themselves contain colons.
    pub fn parse(raw: &str) -> Option<Self> {
        let (metric, sequence) = raw.rsplit_once(':')?;
        if metric.is_empty() {
            return None;
        }
        Some(Self::new(metric, sequence.parse().ok()?))
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.metric, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_keeps_all_fields() {
        let metric =
            CountMetric::from_slice(br#"{"metric":"click","button":"buy","count":2}"#).unwrap();
        assert_eq!(metric.metric(), "click");
        assert_eq!(metric.fields().len(), 3);
        assert_eq!(metric.counter_key(), "idCounter:click");
    }

    #[test]
    fn test_missing_metric() {
        let err = CountMetric::from_slice(br#"{"foo":"bar"}"#).unwrap_err();
        match err {
            HandlerError::Decode { reason, payload } => {
                assert!(reason.contains("missing field"));
                assert_eq!(payload, r#"{"foo":"bar"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_string_and_empty_metric() {
        assert!(CountMetric::from_value(json!({"metric": 5})).is_err());
        assert!(CountMetric::from_value(json!({"metric": ""})).is_err());
        assert!(CountMetric::from_value(json!({"metric": null})).is_err());
    }

    #[test]
    fn test_rejects_non_object_and_malformed() {
        assert!(CountMetric::from_value(json!(["metric", "x"])).is_err());
        assert!(matches!(
            CountMetric::from_slice(b"{not json"),
            Err(HandlerError::Decode { .. })
        ));
    }

    #[test]
    fn test_record_field_stringification() {
        let metric = CountMetric::from_value(json!({
            "metric": "pageview",
            "path": "/home",
            "count": 3,
            "ratio": 0.5,
            "bot": false,
            "referrer": null,
            "tags": ["a", "b"],
            "geo": {"country": "ES"}
        }))
        .unwrap();

        let fields: std::collections::HashMap<String, String> =
            metric.record_fields().into_iter().collect();
        assert_eq!(fields["metric"], "pageview");
        assert_eq!(fields["path"], "/home");
        assert_eq!(fields["count"], "3");
        assert_eq!(fields["ratio"], "0.5");
        assert_eq!(fields["bot"], "false");
        assert_eq!(fields["referrer"], "");
        assert_eq!(fields["tags"], r#"["a","b"]"#);
        assert_eq!(fields["geo"], r#"{"country":"ES"}"#);
    }

    #[test]
    fn test_event_id_format_and_parse() {
        let id = EventId::new("pageview", 3);
        assert_eq!(id.to_string(), "pageview:3");

        let parsed = EventId::parse("api:latency:12").unwrap();
        assert_eq!(parsed.metric(), "api:latency");
        assert_eq!(parsed.sequence(), 12);

        assert!(EventId::parse("nocolon").is_none());
        assert!(EventId::parse(":4").is_none());
        assert!(EventId::parse("m:x").is_none());
    }
}
