//! Document encoding: logical fields as nested JSON values
//!
//! Used for the document store and for local draft files.

use serde_json::{Map, Value};

use super::{decode, field_value, Decoded, Field, FieldSource};
use crate::models::Greeting;

pub const SLUG: &str = "slug";
pub const TITLE: &str = "title";
pub const USER_ID: &str = "userId";
pub const IS_PUBLIC: &str = "isPublic";
pub const VIEW_COUNT: &str = "viewCount";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Document fields that describe the stored record rather than the card
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub slug: String,
    pub title: Option<String>,
    pub user_id: Option<String>,
    pub is_public: bool,
}

/// Card fields only, as a JSON object
pub fn encode(greeting: &Greeting) -> Map<String, Value> {
    Field::ALL
        .iter()
        .map(|&field| (field.key().to_string(), field_value(greeting, field)))
        .collect()
}

/// Card fields plus record metadata. Timestamps are left to the server.
pub fn encode_with_meta(greeting: &Greeting, meta: &DocumentMeta) -> Map<String, Value> {
    let mut doc = encode(greeting);
    doc.insert(SLUG.to_string(), Value::from(meta.slug.as_str()));
    doc.insert(
        TITLE.to_string(),
        meta.title.as_deref().map_or(Value::Null, Value::from),
    );
    doc.insert(
        USER_ID.to_string(),
        meta.user_id.as_deref().map_or(Value::Null, Value::from),
    );
    doc.insert(IS_PUBLIC.to_string(), Value::Bool(meta.is_public));
    doc.insert(VIEW_COUNT.to_string(), Value::from(0));
    doc
}

impl FieldSource for Map<String, Value> {
    fn field(&self, field: Field) -> Option<Value> {
        self.get(field.key()).cloned()
    }
}

/// Decode any JSON value; non-objects decode to the default greeting
pub fn decode_value(value: &Value) -> Decoded {
    match value.as_object() {
        Some(map) => decode(map),
        None => {
            tracing::debug!("Document is not an object, using defaults");
            decode(&Map::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::{greeting, sample_greeting};
    use proptest::prelude::*;

    #[test]
    fn test_structured_fields_are_nested() {
        let doc = encode(&sample_greeting());
        assert!(doc["texts"].is_array());
        assert!(doc["backgroundSettings"].is_object());
        assert_eq!(doc["backgroundSettings"]["gradient"]["direction"], "to bottom right");
        assert_eq!(doc["layout"], "polaroid");
    }

    #[test]
    fn test_meta_fields() {
        let meta = DocumentMeta {
            slug: "ann-tom-birthday-1a2b3c".to_string(),
            title: None,
            user_id: Some("uid-7".to_string()),
            is_public: true,
        };
        let doc = encode_with_meta(&sample_greeting(), &meta);
        assert_eq!(doc[SLUG], "ann-tom-birthday-1a2b3c");
        assert!(doc[TITLE].is_null());
        assert_eq!(doc[USER_ID], "uid-7");
        assert_eq!(doc[IS_PUBLIC], true);
        assert_eq!(doc[VIEW_COUNT], 0);
        assert!(!doc.contains_key(CREATED_AT));

        let decoded = decode(&doc);
        assert_eq!(decoded.greeting, sample_greeting());
    }

    #[test]
    fn test_non_object_document() {
        let decoded = decode_value(&Value::from("garbage"));
        assert_eq!(decoded.greeting, Greeting::default());
    }

    #[test]
    fn test_legacy_json_text_inside_document() {
        let doc = serde_json::json!({
            "eventType": "diwali",
            "emojis": "[{\"id\":\"e1\",\"emoji\":\"🪔\"}]"
        });
        let decoded = decode_value(&doc);
        assert_eq!(decoded.greeting.emojis[0].emoji, "🪔");
    }

    proptest! {
        #[test]
        fn prop_document_roundtrip(greeting in greeting()) {
            let text = serde_json::to_string(&Value::Object(encode(&greeting))).unwrap();
            let value: Value = serde_json::from_str(&text).unwrap();
            let decoded = decode_value(&value);
            prop_assert!(decoded.is_clean());
            prop_assert_eq!(decoded.greeting, greeting);
        }
    }
}
