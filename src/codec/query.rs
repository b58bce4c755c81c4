//! URL query encoding for inline share links

use std::collections::HashMap;

use serde_json::Value;

use super::{field_text, Field, FieldSource};
use crate::models::Greeting;

/// One query parameter per field; structured fields carry JSON text
pub fn encode(greeting: &Greeting) -> Vec<(String, String)> {
    Field::ALL
        .iter()
        .map(|&field| (field.key().to_string(), field_text(greeting, field)))
        .collect()
}

/// Encode as an `application/x-www-form-urlencoded` query string
pub fn to_query_string(greeting: &Greeting) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(encode(greeting))
        .finish()
}

/// Decoded query parameters keyed by name. Later duplicates win.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// True if any parameter names a greeting field
    pub fn has_greeting_fields(&self) -> bool {
        self.0.keys().any(|k| Field::from_key(k).is_some())
    }
}

impl FieldSource for QueryParams {
    fn field(&self, field: Field) -> Option<Value> {
        self.0.get(field.key()).map(|v| Value::String(v.clone()))
    }
}
