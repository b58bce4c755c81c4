//! Conversion between plain JSON and Firestore typed values
//!
//! The REST API wraps every value in a single-key object naming its type:
//! `{"stringValue": "x"}`, `{"integerValue": "42"}` (integers travel as
//! strings), `{"mapValue": {"fields": {...}}}`,
//! `{"arrayValue": {"values": [...]}}` and so on.

use serde_json::{json, Map, Value};

pub fn to_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(to_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": to_fields(map) } }),
    }
}

pub fn to_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()
}

/// Convert a typed value back to plain JSON. Unknown wrappers become null.
pub fn from_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "booleanValue" | "doubleValue" => {
            inner.clone()
        }
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(from_fields)
                .unwrap_or_default(),
        ),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(from_value).collect())
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn from_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), from_value(v)))
        .collect()
}

/// Last path segment of a document resource name
pub fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{document, tests::sample_greeting};

    #[test]
    fn test_scalar_encoding() {
        assert_eq!(to_value(&json!("hi")), json!({ "stringValue": "hi" }));
        assert_eq!(to_value(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(to_value(&json!(0.25)), json!({ "doubleValue": 0.25 }));
        assert_eq!(to_value(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(to_value(&Value::Null), json!({ "nullValue": null }));
    }

    #[test]
    fn test_nested_encoding() {
        let typed = to_value(&json!({ "list": [1, "a"], "empty": {} }));
        assert_eq!(
            typed,
            json!({ "mapValue": { "fields": {
                "list": { "arrayValue": { "values": [
                    { "integerValue": "1" },
                    { "stringValue": "a" }
                ] } },
                "empty": { "mapValue": { "fields": {} } }
            } } })
        );
    }

    #[test]
    fn test_decode_server_values() {
        assert_eq!(
            from_value(&json!({ "timestampValue": "2026-02-01T10:00:00Z" })),
            json!("2026-02-01T10:00:00Z")
        );
        assert_eq!(from_value(&json!({ "integerValue": "7" })), json!(7));
        assert_eq!(from_value(&json!({ "geoPointValue": {} })), Value::Null);
        assert_eq!(from_value(&json!({ "arrayValue": {} })), json!([]));
        assert_eq!(from_value(&json!("bare")), Value::Null);
    }

    #[test]
    fn test_greeting_document_roundtrip() {
        let doc = document::encode(&sample_greeting());
        let back = from_fields(&to_fields(&doc));
        assert_eq!(back, doc);
        assert_eq!(document::decode_value(&Value::Object(back)).greeting, sample_greeting());
    }

    #[test]
    fn test_document_id() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/greetings/abc123"),
            "abc123"
        );
        assert_eq!(document_id("abc"), "abc");
    }
}
