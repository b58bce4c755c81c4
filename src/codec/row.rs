//! Relational row encoding (`greetings` table)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{decode, field_text, Decoded, Field, FieldSource};
use crate::models::Greeting;

/// Row metadata that is not part of the card itself
#[derive(Debug, Clone, Default)]
pub struct RowMeta {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub slug: String,
}

/// Scalar column: strings pass through, numbers and bools become their
/// text, anything else reads as absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        _ => None,
    })
}

pub(crate) fn lenient_slug<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Counter column: null or unreadable values count as zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// A row of the `greetings` table as exchanged with the REST API.
///
/// JSON columns are written as JSON text. On read they are accepted either
/// as text or as native JSON (for `jsonb` columns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GreetingRow {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_slug")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub event_emoji: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub receiver_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub layout: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub frame_style: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub animation_style: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_position: Option<Value>,
    #[serde(default)]
    pub texts: Option<Value>,
    #[serde(default)]
    pub media: Option<Value>,
    #[serde(default)]
    pub emojis: Option<Value>,
    #[serde(default)]
    pub background_settings: Option<Value>,
    #[serde(default)]
    pub border_settings: Option<Value>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub view_count: i64,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl GreetingRow {
    /// Build the row to insert for a greeting.
    ///
    /// `event_name` and `event_emoji` are only set for custom events.
    pub fn from_greeting(greeting: &Greeting, meta: RowMeta) -> Self {
        let text = |field: Field| Some(field_text(greeting, field));
        let json = |field: Field| Some(Value::String(field_text(greeting, field)));
        let custom = greeting.is_custom();

        Self {
            id: None,
            user_id: meta.user_id,
            title: meta.title,
            slug: meta.slug,
            event_type: text(Field::EventType),
            event_name: custom.then(|| greeting.custom_event_name.clone()),
            event_emoji: custom.then(|| greeting.custom_event_emoji.clone()),
            sender_name: text(Field::SenderName),
            receiver_name: text(Field::ReceiverName),
            theme: text(Field::Theme),
            layout: text(Field::Layout),
            frame_style: text(Field::FrameStyle),
            animation_style: text(Field::AnimationStyle),
            video_url: text(Field::VideoUrl),
            video_position: json(Field::VideoPosition),
            texts: json(Field::Texts),
            media: json(Field::Media),
            emojis: json(Field::Emojis),
            background_settings: json(Field::BackgroundSettings),
            border_settings: json(Field::BorderSettings),
            view_count: 0,
            created_at: None,
        }
    }

    pub fn decode(&self) -> Decoded {
        decode(self)
    }
}

impl FieldSource for GreetingRow {
    fn field(&self, field: Field) -> Option<Value> {
        let text = |v: &Option<String>| v.clone().map(Value::String);
        match field {
            Field::EventType => text(&self.event_type),
            Field::CustomEventName => text(&self.event_name),
            Field::CustomEventEmoji => text(&self.event_emoji),
            Field::SenderName => text(&self.sender_name),
            Field::ReceiverName => text(&self.receiver_name),
            Field::VideoUrl => text(&self.video_url),
            Field::AnimationStyle => text(&self.animation_style),
            Field::Layout => text(&self.layout),
            Field::Theme => text(&self.theme),
            Field::FrameStyle => text(&self.frame_style),
            Field::Texts => self.texts.clone(),
            Field::Media => self.media.clone(),
            Field::VideoPosition => self.video_position.clone(),
            Field::BackgroundSettings => self.background_settings.clone(),
            Field::Emojis => self.emojis.clone(),
            Field::BorderSettings => self.border_settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::{greeting, sample_greeting};
    use crate::models::{BorderSettings, Layout};
    use proptest::prelude::*;

    fn meta() -> RowMeta {
        RowMeta {
            user_id: Some("user-1".to_string()),
            title: Some("For Tom".to_string()),
            slug: "ann-tom-birthday".to_string(),
        }
    }

    #[test]
    fn test_predefined_event_has_null_custom_columns() {
        let row = GreetingRow::from_greeting(&sample_greeting(), meta());
        assert_eq!(row.event_type.as_deref(), Some("birthday"));
        assert_eq!(row.event_name, None);
        assert_eq!(row.event_emoji, None);

        let json = serde_json::to_value(&row).unwrap();
        assert!(json["event_name"].is_null());
        assert_eq!(json["slug"], "ann-tom-birthday");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_custom_event_columns() {
        let mut greeting = sample_greeting();
        greeting.set_custom_event("Promotion Party", "🥂");
        let row = GreetingRow::from_greeting(&greeting, meta());
        assert_eq!(row.event_type.as_deref(), Some("custom"));
        assert_eq!(row.event_name.as_deref(), Some("Promotion Party"));
        assert_eq!(row.event_emoji.as_deref(), Some("🥂"));
        assert_eq!(row.decode().greeting, greeting);
    }

    #[test]
    fn test_json_columns_are_text() {
        let row = GreetingRow::from_greeting(&sample_greeting(), meta());
        let texts = row.texts.as_ref().and_then(Value::as_str).unwrap();
        assert!(texts.starts_with('['));
        assert!(row.border_settings.as_ref().unwrap().is_string());
    }

    #[test]
    fn test_row_from_api_with_jsonb_and_nulls() {
        let row: GreetingRow = serde_json::from_value(serde_json::json!({
            "id": "0b6f3c1e-0000-4000-8000-000000000001",
            "slug": "ann-tom-birthday",
            "event_type": "birthday",
            "event_name": null,
            "sender_name": null,
            "receiver_name": "Tom",
            "layout": "hexagon",
            "texts": [{"id": "t1", "content": "Hi"}],
            "media": "not json",
            "border_settings": null,
            "view_count": 12,
            "created_at": "2026-02-01T10:00:00+00:00"
        }))
        .unwrap();

        let decoded = row.decode();
        assert_eq!(decoded.greeting.sender_name, "Someone");
        assert_eq!(decoded.greeting.receiver_name, "Tom");
        assert_eq!(decoded.greeting.layout, Layout::Hexagon);
        assert_eq!(decoded.greeting.texts[0].content, "Hi");
        assert!(decoded.greeting.media.is_empty());
        assert_eq!(decoded.greeting.border_settings, BorderSettings::default());
        assert_eq!(decoded.repaired, vec![Field::Media]);
        assert_eq!(row.view_count, 12);
    }

    #[test]
    fn test_null_and_mistyped_scalars_still_decode() {
        let row: GreetingRow = serde_json::from_value(serde_json::json!({
            "slug": "ann-tom-birthday",
            "event_type": "birthday",
            "theme": 5,
            "view_count": null
        }))
        .unwrap();
        assert_eq!(row.view_count, 0);
        let decoded = row.decode();
        assert_eq!(decoded.greeting.event_type, "birthday");
        assert_eq!(decoded.greeting.theme, "5");

        let row: GreetingRow = serde_json::from_value(serde_json::json!({
            "id": 42,
            "slug": null,
            "title": ["not", "text"],
            "sender_name": true,
            "view_count": "7"
        }))
        .unwrap();
        assert_eq!(row.id.as_deref(), Some("42"));
        assert_eq!(row.slug, "");
        assert_eq!(row.title, None);
        assert_eq!(row.view_count, 7);
        assert_eq!(row.decode().greeting.sender_name, "true");
    }

    #[test]
    fn test_row_roundtrip_through_json() {
        let greeting = sample_greeting();
        let row = GreetingRow::from_greeting(&greeting, meta());
        let text = serde_json::to_string(&row).unwrap();
        let back: GreetingRow = serde_json::from_str(&text).unwrap();
        assert_eq!(back.decode().greeting, greeting);
    }

    proptest! {
        #[test]
        fn prop_row_roundtrip(greeting in greeting()) {
            let row = GreetingRow::from_greeting(&greeting, RowMeta::default());
            let decoded = row.decode();
            prop_assert!(decoded.is_clean());
            prop_assert_eq!(decoded.greeting, greeting);
        }
    }
}
