//! Greeting card model

use serde::{Deserialize, Serialize};

use super::lenient::{optional_tag, tag_enum};
use super::style::{
    AnimationStyle, BackgroundSettings, BorderSettings, DecorativeElement, Layout, VideoPosition,
};

/// Event tag marking a user-defined occasion
pub const CUSTOM_EVENT: &str = "custom";
pub const DEFAULT_SENDER: &str = "Someone";
pub const DEFAULT_RECEIVER: &str = "You";

tag_enum! {
    pub enum MediaType (default = Image) {
        Image => "image",
        Video => "video",
    }
}

tag_enum! {
    pub enum FontWeight (default = Normal) {
        Normal => "normal",
        Bold => "bold",
    }
}

tag_enum! {
    pub enum TextAlign (default = Center) {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

/// Point on the card, in percent of width/height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Rendered size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: u32,
    pub font_family: String,
    pub color: String,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16,
            font_family: "inherit".to_string(),
            color: "#1f2937".to_string(),
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
            italic: false,
        }
    }
}

/// Block of message text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextContent {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub style: TextStyle,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_tag"
    )]
    pub animation: Option<AnimationStyle>,
}

/// Photo or video placed on the card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaItem {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub size: Size,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_tag"
    )]
    pub animation: Option<AnimationStyle>,
    /// Higher priority items are placed first by the layout
    pub priority: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text_overlays: Vec<TextContent>,
}

/// Emoji sticker placed freely on the card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmojiSticker {
    pub id: String,
    pub emoji: String,
    pub position: Position,
    pub size: u32,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_tag"
    )]
    pub animation: Option<AnimationStyle>,
}

impl Default for EmojiSticker {
    fn default() -> Self {
        Self {
            id: String::new(),
            emoji: String::new(),
            position: Position::default(),
            size: 48,
            animation: None,
        }
    }
}

/// A complete greeting card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Greeting {
    pub event_type: String,
    pub custom_event_name: String,
    pub custom_event_emoji: String,
    pub sender_name: String,
    pub receiver_name: String,
    pub texts: Vec<TextContent>,
    pub media: Vec<MediaItem>,
    pub video_url: String,
    pub video_position: VideoPosition,
    pub background_settings: BackgroundSettings,
    pub border_settings: BorderSettings,
    pub emojis: Vec<EmojiSticker>,
    pub layout: Layout,
    pub animation_style: AnimationStyle,
    pub theme: String,
    pub frame_style: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self {
            event_type: String::new(),
            custom_event_name: String::new(),
            custom_event_emoji: String::new(),
            sender_name: DEFAULT_SENDER.to_string(),
            receiver_name: DEFAULT_RECEIVER.to_string(),
            texts: Vec::new(),
            media: Vec::new(),
            video_url: String::new(),
            video_position: VideoPosition::default(),
            background_settings: BackgroundSettings::default(),
            border_settings: BorderSettings::default(),
            emojis: Vec::new(),
            layout: Layout::default(),
            animation_style: AnimationStyle::default(),
            theme: String::new(),
            frame_style: String::new(),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Greeting {
    /// Start a greeting for a predefined event
    pub fn for_event(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            ..Self::default()
        }
    }

    pub fn is_custom(&self) -> bool {
        self.event_type == CUSTOM_EVENT
    }

    pub fn set_custom_event(&mut self, name: &str, emoji: &str) {
        self.event_type = CUSTOM_EVENT.to_string();
        self.custom_event_name = name.to_string();
        self.custom_event_emoji = emoji.to_string();
    }

    /// A custom name without an event tag means a custom event.
    /// Returns true if the event tag was changed.
    pub fn normalize_event_type(&mut self) -> bool {
        if self.event_type.trim().is_empty() && !self.custom_event_name.trim().is_empty() {
            self.event_type = CUSTOM_EVENT.to_string();
            return true;
        }
        false
    }

    /// Event name used for slugs and titles
    pub fn event_name(&self) -> &str {
        if self.is_custom() || self.event_type.is_empty() {
            &self.custom_event_name
        } else {
            &self.event_type
        }
    }

    /// Resolve an item's animation against the card-wide default
    pub fn effective_animation(&self, item: Option<AnimationStyle>) -> AnimationStyle {
        item.unwrap_or(self.animation_style)
    }

    pub fn add_text(&mut self, content: &str) -> String {
        let id = new_id();
        self.texts.push(TextContent {
            id: id.clone(),
            content: content.to_string(),
            ..TextContent::default()
        });
        id
    }

    pub fn add_media(&mut self, url: &str, kind: MediaType) -> String {
        let id = new_id();
        self.media.push(MediaItem {
            id: id.clone(),
            url: url.to_string(),
            kind,
            priority: self.media.len() as i32,
            ..MediaItem::default()
        });
        id
    }

    pub fn add_emoji(&mut self, emoji: &str, position: Position) -> String {
        let id = new_id();
        self.emojis.push(EmojiSticker {
            id: id.clone(),
            emoji: emoji.to_string(),
            position,
            ..EmojiSticker::default()
        });
        id
    }

    /// Attach a decoration to the next free border slot
    pub fn add_decoration(&mut self, kind: super::style::DecorationKind, content: &str) -> String {
        let id = new_id();
        let elements = &mut self.border_settings.elements;
        let position = elements.iter().map(|e| e.position + 1).max().unwrap_or(0);
        elements.push(DecorativeElement {
            id: id.clone(),
            kind,
            content: content.to_string(),
            position,
            ..DecorativeElement::default()
        });
        id
    }

    pub fn remove_text(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.texts, id, |t| &t.id)
    }

    pub fn remove_media(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.media, id, |m| &m.id)
    }

    pub fn remove_emoji(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.emojis, id, |e| &e.id)
    }

    pub fn remove_decoration(&mut self, id: &str) -> bool {
        remove_by_id(&mut self.border_settings.elements, id, |e| &e.id)
    }

    /// Give every list item a non-empty id that is unique within its list.
    /// Returns true if any id was changed.
    pub fn repair_ids(&mut self) -> bool {
        let mut changed = false;
        changed |= dedupe_ids(self.texts.iter_mut().map(|t| &mut t.id));
        changed |= dedupe_ids(self.media.iter_mut().map(|m| &mut m.id));
        for item in &mut self.media {
            changed |= dedupe_ids(item.text_overlays.iter_mut().map(|t| &mut t.id));
        }
        changed |= dedupe_ids(self.emojis.iter_mut().map(|e| &mut e.id));
        changed |= dedupe_ids(self.border_settings.elements.iter_mut().map(|e| &mut e.id));
        changed
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &String) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

fn dedupe_ids<'a>(ids: impl Iterator<Item = &'a mut String>) -> bool {
    let ids: Vec<&mut String> = ids.collect();
    let mut seen: std::collections::HashSet<String> = ids
        .iter()
        .filter(|id| !id.is_empty())
        .map(|id| id.to_string())
        .collect();
    let mut kept = std::collections::HashSet::new();
    let mut changed = false;

    for id in ids {
        if id.is_empty() {
            *id = new_id();
            changed = true;
        } else if !kept.insert(id.clone()) {
            let mut n = 2;
            let mut candidate = format!("{}-{}", id, n);
            while seen.contains(&candidate) {
                n += 1;
                candidate = format!("{}-{}", id, n);
            }
            seen.insert(candidate.clone());
            kept.insert(candidate.clone());
            *id = candidate;
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::super::style::DecorationKind;
    use super::*;

    #[test]
    fn test_default_names() {
        let greeting = Greeting::default();
        assert_eq!(greeting.sender_name, "Someone");
        assert_eq!(greeting.receiver_name, "You");
        assert_eq!(greeting.layout, Layout::Grid);
        assert_eq!(greeting.animation_style, AnimationStyle::Fade);
    }

    #[test]
    fn test_normalize_custom_event() {
        let mut greeting = Greeting {
            custom_event_name: "Graduation".to_string(),
            ..Greeting::default()
        };
        assert!(greeting.normalize_event_type());
        assert_eq!(greeting.event_type, "custom");
        assert!(!greeting.normalize_event_type());
    }

    #[test]
    fn test_normalize_leaves_predefined_event() {
        let mut greeting = Greeting::for_event("birthday");
        greeting.custom_event_name = "Ignored".to_string();
        assert!(!greeting.normalize_event_type());
        assert_eq!(greeting.event_type, "birthday");
        assert_eq!(greeting.event_name(), "birthday");
    }

    #[test]
    fn test_add_and_remove_items() {
        let mut greeting = Greeting::for_event("birthday");
        let first = greeting.add_text("Happy birthday!");
        let second = greeting.add_text("Have a great day");
        assert_ne!(first, second);
        assert_eq!(greeting.texts.len(), 2);

        assert!(greeting.remove_text(&first));
        assert!(!greeting.remove_text(&first));
        assert_eq!(greeting.texts[0].content, "Have a great day");

        let media = greeting.add_media("https://img.example/cake.png", MediaType::Image);
        assert!(greeting.remove_media(&media));

        let emoji = greeting.add_emoji("🎂", Position { x: 10.0, y: 20.0 });
        assert_eq!(greeting.emojis[0].size, 48);
        assert!(greeting.remove_emoji(&emoji));
    }

    #[test]
    fn test_decorations_take_next_slot() {
        let mut greeting = Greeting::default();
        greeting.add_decoration(DecorationKind::Emoji, "🌸");
        let second = greeting.add_decoration(DecorationKind::Image, "https://img.example/leaf.png");
        let elements = &greeting.border_settings.elements;
        assert_eq!(elements[0].position, 0);
        assert_eq!(elements[1].position, 1);
        assert!(greeting.remove_decoration(&second));
    }

    #[test]
    fn test_effective_animation() {
        let greeting = Greeting {
            animation_style: AnimationStyle::Bounce,
            ..Greeting::default()
        };
        assert_eq!(greeting.effective_animation(None), AnimationStyle::Bounce);
        assert_eq!(
            greeting.effective_animation(Some(AnimationStyle::Zoom)),
            AnimationStyle::Zoom
        );
    }

    #[test]
    fn test_repair_ids() {
        let mut greeting = Greeting::default();
        for id in ["a", "a", "", "a-2"] {
            greeting.texts.push(TextContent {
                id: id.to_string(),
                ..TextContent::default()
            });
        }

        assert!(greeting.repair_ids());
        let ids: Vec<&str> = greeting.texts.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids[0], "a");
        assert_eq!(ids[1], "a-3");
        assert!(!ids[2].is_empty());
        assert_eq!(ids[3], "a-2");
        assert!(!greeting.repair_ids());
    }
}
