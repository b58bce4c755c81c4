//! Greeting transport encodings
//!
//! A greeting travels in three shapes: URL query parameters (inline share
//! links), a relational row with JSON text columns, and a document with
//! nested values. All three share one field table and one decoder, so the
//! defaulting rules are identical whichever way a card arrives.
//!
//! Decoding never fails. A field that is missing or cannot be decoded takes
//! its default and is reported in [`Decoded::repaired`].

pub mod document;
pub mod query;
pub mod row;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::Context;
use crate::models::lenient::Tag;
use crate::models::{
    event, AnimationStyle, EventType, Greeting, Layout, DEFAULT_RECEIVER, DEFAULT_SENDER,
};

/// Top-level greeting field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EventType,
    CustomEventName,
    CustomEventEmoji,
    SenderName,
    ReceiverName,
    Texts,
    Media,
    VideoUrl,
    VideoPosition,
    AnimationStyle,
    Layout,
    Theme,
    FrameStyle,
    BackgroundSettings,
    Emojis,
    BorderSettings,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::EventType,
        Field::CustomEventName,
        Field::CustomEventEmoji,
        Field::SenderName,
        Field::ReceiverName,
        Field::Texts,
        Field::Media,
        Field::VideoUrl,
        Field::VideoPosition,
        Field::AnimationStyle,
        Field::Layout,
        Field::Theme,
        Field::FrameStyle,
        Field::BackgroundSettings,
        Field::Emojis,
        Field::BorderSettings,
    ];

    /// Name used in query strings and documents
    pub fn key(self) -> &'static str {
        match self {
            Field::EventType => "eventType",
            Field::CustomEventName => "customEventName",
            Field::CustomEventEmoji => "customEventEmoji",
            Field::SenderName => "senderName",
            Field::ReceiverName => "receiverName",
            Field::Texts => "texts",
            Field::Media => "media",
            Field::VideoUrl => "videoUrl",
            Field::VideoPosition => "videoPosition",
            Field::AnimationStyle => "animationStyle",
            Field::Layout => "layout",
            Field::Theme => "theme",
            Field::FrameStyle => "frameStyle",
            Field::BackgroundSettings => "backgroundSettings",
            Field::Emojis => "emojis",
            Field::BorderSettings => "borderSettings",
        }
    }

    /// Column name in the relational `greetings` table
    pub fn column(self) -> &'static str {
        match self {
            Field::EventType => "event_type",
            Field::CustomEventName => "event_name",
            Field::CustomEventEmoji => "event_emoji",
            Field::SenderName => "sender_name",
            Field::ReceiverName => "receiver_name",
            Field::Texts => "texts",
            Field::Media => "media",
            Field::VideoUrl => "video_url",
            Field::VideoPosition => "video_position",
            Field::AnimationStyle => "animation_style",
            Field::Layout => "layout",
            Field::Theme => "theme",
            Field::FrameStyle => "frame_style",
            Field::BackgroundSettings => "background_settings",
            Field::Emojis => "emojis",
            Field::BorderSettings => "border_settings",
        }
    }

    /// Structured fields are JSON-encoded in flat transports
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            Field::Texts
                | Field::Media
                | Field::VideoPosition
                | Field::BackgroundSettings
                | Field::Emojis
                | Field::BorderSettings
        )
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }
}

/// Native JSON value of a field
pub fn field_value(greeting: &Greeting, field: Field) -> Value {
    fn json<T: serde::Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap_or(Value::Null)
    }

    match field {
        Field::EventType => Value::from(greeting.event_type.as_str()),
        Field::CustomEventName => Value::from(greeting.custom_event_name.as_str()),
        Field::CustomEventEmoji => Value::from(greeting.custom_event_emoji.as_str()),
        Field::SenderName => Value::from(greeting.sender_name.as_str()),
        Field::ReceiverName => Value::from(greeting.receiver_name.as_str()),
        Field::Texts => json(&greeting.texts),
        Field::Media => json(&greeting.media),
        Field::VideoUrl => Value::from(greeting.video_url.as_str()),
        Field::VideoPosition => json(&greeting.video_position),
        Field::AnimationStyle => Value::from(greeting.animation_style.as_str()),
        Field::Layout => Value::from(greeting.layout.as_str()),
        Field::Theme => Value::from(greeting.theme.as_str()),
        Field::FrameStyle => Value::from(greeting.frame_style.as_str()),
        Field::BackgroundSettings => json(&greeting.background_settings),
        Field::Emojis => json(&greeting.emojis),
        Field::BorderSettings => json(&greeting.border_settings),
    }
}

/// Flat string form of a field: scalars as-is, structured fields as JSON text
pub fn field_text(greeting: &Greeting, field: Field) -> String {
    match field_value(greeting, field) {
        Value::String(s) if !field.is_structured() => s,
        other => other.to_string(),
    }
}

/// Anything a greeting can be read back from.
///
/// Structured fields may be returned either as JSON text (`Value::String`)
/// or as native values; `Value::Null` and `None` both mean absent.
pub trait FieldSource {
    fn field(&self, field: Field) -> Option<Value>;
}

/// Result of decoding a transport representation
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub greeting: Greeting,
    /// Fields that were present but unusable and fell back to defaults
    pub repaired: Vec<Field>,
}

impl Decoded {
    /// Event descriptor for display, `None` for unknown events
    pub fn event(&self, ctx: &Context) -> Option<EventType> {
        event::resolve(&self.greeting, ctx.language)
    }

    pub fn is_clean(&self) -> bool {
        self.repaired.is_empty()
    }
}

struct Reader<'a, S: ?Sized> {
    source: &'a S,
    repaired: Vec<Field>,
}

impl<S: FieldSource + ?Sized> Reader<'_, S> {
    fn present(&self, field: Field) -> Option<Value> {
        self.source.field(field).filter(|v| !v.is_null())
    }

    fn scalar(&mut self, field: Field, default: &str) -> String {
        match self.present(field) {
            None => default.to_string(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(_) => {
                tracing::debug!("Field {} is not a scalar, using default", field.key());
                self.repaired.push(field);
                default.to_string()
            }
        }
    }

    fn tag<T: Tag + Default>(&mut self, field: Field) -> T {
        let Some(value) = self.present(field) else {
            return T::default();
        };
        match value.as_str().and_then(T::from_tag) {
            Some(tag) => tag,
            None => {
                tracing::debug!("Unknown {} value {}, using default", field.key(), value);
                self.repaired.push(field);
                T::default()
            }
        }
    }

    fn structured<T: DeserializeOwned + Default>(&mut self, field: Field) -> T {
        let decoded = match self.present(field) {
            None => return T::default(),
            Some(Value::String(text)) => serde_json::from_str(&text),
            Some(value) => serde_json::from_value(value),
        };
        decoded.unwrap_or_else(|e| {
            tracing::debug!("Malformed {} field ({}), using default", field.key(), e);
            self.repaired.push(field);
            T::default()
        })
    }
}

/// Rebuild a greeting from any transport representation
pub fn decode<S: FieldSource + ?Sized>(source: &S) -> Decoded {
    let mut reader = Reader {
        source,
        repaired: Vec::new(),
    };

    let mut greeting = Greeting {
        event_type: reader.scalar(Field::EventType, ""),
        custom_event_name: reader.scalar(Field::CustomEventName, ""),
        custom_event_emoji: reader.scalar(Field::CustomEventEmoji, ""),
        sender_name: reader.scalar(Field::SenderName, DEFAULT_SENDER),
        receiver_name: reader.scalar(Field::ReceiverName, DEFAULT_RECEIVER),
        texts: reader.structured(Field::Texts),
        media: reader.structured(Field::Media),
        video_url: reader.scalar(Field::VideoUrl, ""),
        video_position: reader.structured(Field::VideoPosition),
        background_settings: reader.structured(Field::BackgroundSettings),
        border_settings: reader.structured(Field::BorderSettings),
        emojis: reader.structured(Field::Emojis),
        layout: reader.tag::<Layout>(Field::Layout),
        animation_style: reader.tag::<AnimationStyle>(Field::AnimationStyle),
        theme: reader.scalar(Field::Theme, ""),
        frame_style: reader.scalar(Field::FrameStyle, ""),
    };

    greeting.normalize_event_type();
    if greeting.repair_ids() {
        tracing::debug!("Repaired missing or duplicate item ids");
    }

    Decoded {
        greeting,
        repaired: reader.repaired,
    }
}
