//! Layout, animation, background and border settings

use serde::{Deserialize, Serialize};

use super::lenient::{optional_tag, tag_enum};
use super::greeting::Position;

tag_enum! {
    /// Card layout strategy
    pub enum Layout (default = Grid) {
        Grid => "grid",
        Masonry => "masonry",
        Carousel => "carousel",
        Stack => "stack",
        Collage => "collage",
        Mosaic => "mosaic",
        Slideshow => "slideshow",
        Polaroid => "polaroid",
        Magazine => "magazine",
        Gallery => "gallery",
        Timeline => "timeline",
        Hexagon => "hexagon",
        Circular => "circular",
        Spiral => "spiral",
        Wave => "wave",
    }
}

tag_enum! {
    /// Entrance animation for a card item, or the card-wide default
    pub enum AnimationStyle (default = Fade) {
        Fade => "fade",
        Slide => "slide",
        Bounce => "bounce",
        Zoom => "zoom",
        Rotate => "rotate",
        Flip => "flip",
        Pulse => "pulse",
        Float => "float",
        Swing => "swing",
        Glow => "glow",
        None => "none",
    }
}

tag_enum! {
    pub enum GradientDirection (default = ToBottom) {
        ToBottom => "to bottom",
        ToTop => "to top",
        ToRight => "to right",
        ToLeft => "to left",
        ToBottomRight => "to bottom right",
        ToBottomLeft => "to bottom left",
        ToTopRight => "to top right",
        ToTopLeft => "to top left",
    }
}

tag_enum! {
    /// Ambient effect drawn behind the card content
    pub enum BackgroundAnimationKind (default = Particles) {
        Particles => "particles",
        Bubbles => "bubbles",
        Confetti => "confetti",
        Snow => "snow",
        Stars => "stars",
        Hearts => "hearts",
        Sparkles => "sparkles",
        Waves => "waves",
    }
}

tag_enum! {
    pub enum PatternKind (default = Dots) {
        Dots => "dots",
        Stripes => "stripes",
        Grid => "grid",
        Waves => "waves",
        Hearts => "hearts",
        Stars => "stars",
        Checks => "checks",
    }
}

tag_enum! {
    pub enum BorderStyle (default = Solid) {
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
        Double => "double",
        Groove => "groove",
        Ridge => "ridge",
        Inset => "inset",
        Outset => "outset",
    }
}

tag_enum! {
    pub enum BorderAnimation (default = Glow) {
        Glow => "glow",
        Pulse => "pulse",
        Rainbow => "rainbow",
        Shimmer => "shimmer",
        Dash => "dash",
    }
}

tag_enum! {
    /// What a border decoration displays
    pub enum DecorationKind (default = Emoji) {
        Emoji => "emoji",
        Image => "image",
    }
}

/// Two-color linear gradient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gradient {
    pub from: String,
    pub to: String,
    pub direction: GradientDirection,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            from: "#fdf2f8".to_string(),
            to: "#e0e7ff".to_string(),
            direction: GradientDirection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundAnimation {
    #[serde(rename = "type")]
    pub kind: BackgroundAnimationKind,
    /// 1 (slow) to 10 (fast)
    pub speed: u8,
    /// 1 (subtle) to 10 (dense)
    pub intensity: u8,
}

impl Default for BackgroundAnimation {
    fn default() -> Self {
        Self {
            kind: BackgroundAnimationKind::default(),
            speed: 5,
            intensity: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundPattern {
    #[serde(rename = "type")]
    pub kind: PatternKind,
    /// 0.0 to 1.0
    pub opacity: f64,
}

impl Default for BackgroundPattern {
    fn default() -> Self {
        Self {
            kind: PatternKind::default(),
            opacity: 0.1,
        }
    }
}

/// Card background. The default is a plain white card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundSettings {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<BackgroundAnimation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<BackgroundPattern>,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            gradient: None,
            animation: None,
            pattern: None,
        }
    }
}

/// Image or emoji attached to the card border
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecorativeElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DecorationKind,
    pub content: String,
    /// Slot index along the border, clockwise from the top-left corner
    pub position: u32,
    pub size: u32,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_tag"
    )]
    pub animation: Option<AnimationStyle>,
}

impl Default for DecorativeElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: DecorationKind::default(),
            content: String::new(),
            position: 0,
            size: 32,
            animation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderSettings {
    pub enabled: bool,
    pub style: BorderStyle,
    pub width: u32,
    pub color: String,
    pub radius: u32,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_tag"
    )]
    pub animation: Option<BorderAnimation>,
    pub elements: Vec<DecorativeElement>,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            style: BorderStyle::default(),
            width: 2,
            color: "#e5e7eb".to_string(),
            radius: 12,
            animation: None,
            elements: Vec::new(),
        }
    }
}

/// Placement of the card's optional video, in percent of the card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for VideoPosition {
    fn default() -> Self {
        let Position { x, y } = Position::default();
        Self {
            x,
            y,
            width: 100.0,
            height: 100.0,
        }
    }
}
