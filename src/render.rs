//! Plain-text card preview for the terminal

use unicode_width::UnicodeWidthStr;

use crate::context::Context;
use crate::models::{EventType, Greeting};

const MAX_WIDTH: usize = 60;
const GENERIC_TITLE: &str = "✉️ A greeting";

/// Word-wrap `text` to `width` display columns.
///
/// Words wider than `width` are kept whole on their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.width()
            } else {
                line.width() + 1 + word.width()
            };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn boxed(lines: &[String]) -> String {
    let inner = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    let rule = "─".repeat(inner + 2);

    let mut out = format!("┌{}┐\n", rule);
    for line in lines {
        let padding = inner - line.width();
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(padding)));
    }
    out.push_str(&format!("└{}┘", rule));
    out
}

fn media_summary(greeting: &Greeting) -> Option<String> {
    let count = greeting.media.len();
    let video = !greeting.video_url.trim().is_empty();
    match (count, video) {
        (0, false) => None,
        (0, true) => Some("Media: video".to_string()),
        (1, v) => Some(format!("Media: 1 item{}", if v { " + video" } else { "" })),
        (n, v) => Some(format!("Media: {} items{}", n, if v { " + video" } else { "" })),
    }
}

/// Boxed summary of a greeting. `event` is `None` for unknown events.
pub fn preview(greeting: &Greeting, event: Option<&EventType>, ctx: &Context) -> String {
    let mut lines = Vec::new();

    lines.push(match event {
        Some(e) => format!("{} {}", e.emoji, e.label),
        None => GENERIC_TITLE.to_string(),
    });
    lines.push(format!(
        "From {} to {}",
        greeting.sender_name, greeting.receiver_name
    ));
    lines.push(String::new());

    let texts: Vec<&str> = greeting
        .texts
        .iter()
        .map(|t| t.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();
    if texts.is_empty() {
        if let Some(e) = event {
            lines.extend(wrap(&e.default_message, MAX_WIDTH));
        }
    } else {
        for text in texts {
            lines.extend(wrap(text, MAX_WIDTH));
        }
    }
    lines.push(String::new());

    if let Some(media) = media_summary(greeting) {
        lines.push(media);
    }
    if !greeting.emojis.is_empty() {
        let glyphs: Vec<&str> = greeting.emojis.iter().map(|e| e.emoji.as_str()).collect();
        lines.extend(wrap(&format!("Stickers: {}", glyphs.join(" ")), MAX_WIDTH));
    }

    lines.push(format!("Layout: {}", greeting.layout));
    lines.push(format!("Animation: {}", greeting.animation_style));
    let theme = ctx.theme_for(&greeting.theme);
    lines.push(format!(
        "Theme: {}",
        if theme.trim().is_empty() { "default" } else { theme }
    ));

    boxed(&lines)
}

/// One line per editable item with its id and effective animation
pub fn item_list(greeting: &Greeting) -> String {
    let mut lines = Vec::new();
    let animation = |item| greeting.effective_animation(item);

    for t in &greeting.texts {
        lines.push(format!("text     {}  {:<7} {}", t.id, animation(t.animation), t.content));
    }
    for m in &greeting.media {
        lines.push(format!("{:<8} {}  {:<7} {}", m.kind, m.id, animation(m.animation), m.url));
    }
    for e in &greeting.emojis {
        lines.push(format!("sticker  {}  {:<7} {}", e.id, animation(e.animation), e.emoji));
    }
    for d in &greeting.border_settings.elements {
        lines.push(format!("border   {}  {:<7} {}", d.id, animation(d.animation), d.content));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::sample_greeting;
    use crate::context::Language;
    use crate::models::{event, AnimationStyle};

    fn en() -> Context {
        Context::new(Language::English, "")
    }

    #[test]
    fn test_preview_known_event() {
        let greeting = sample_greeting();
        let descriptor = event::resolve(&greeting, Language::English);
        let out = preview(&greeting, descriptor.as_ref(), &en());

        assert!(out.starts_with('┌'));
        assert!(out.contains("🎂 Birthday"));
        assert!(out.contains("From Ann to Tom"));
        assert!(out.contains("Layout: polaroid"));
        assert!(out.contains("Animation: slide"));
        assert!(out.contains("Theme: sunset"));
    }

    #[test]
    fn test_preview_unknown_event() {
        let greeting = Greeting::for_event("solstice");
        let out = preview(&greeting, None, &Context::new(Language::English, "pastel"));
        assert!(out.contains(GENERIC_TITLE));
        assert!(out.contains("From Someone to You"));
        assert!(out.contains("Theme: pastel"));
        assert!(!out.contains("Media:"));
    }

    #[test]
    fn test_default_message_when_no_texts() {
        let greeting = Greeting::for_event("birthday");
        let descriptor = event::lookup("birthday");
        let out = preview(&greeting, descriptor.as_ref(), &en());
        assert!(out.contains("Wishing you a day filled with happiness"));
        assert!(out.contains("Theme: default"));
    }

    #[test]
    fn test_box_lines_have_equal_width() {
        let mut greeting = sample_greeting();
        greeting.add_text(&"celebrate ".repeat(20));
        let out = preview(&greeting, None, &en());
        let widths: Vec<usize> = out.lines().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
        assert!(widths[0] <= MAX_WIDTH + 4);
    }

    #[test]
    fn test_item_list_resolves_animation() {
        let mut greeting = Greeting::default();
        greeting.animation_style = AnimationStyle::Bounce;
        let id = greeting.add_text("Hi");
        greeting.texts[0].animation = Some(AnimationStyle::Zoom);
        greeting.add_emoji("🎈", Default::default());

        let list = item_list(&greeting);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("text     {}  zoom", id)));
        assert!(lines[1].contains("bounce"));
        assert!(lines[1].ends_with("🎈"));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_media_summary() {
        let mut greeting = Greeting::default();
        assert_eq!(media_summary(&greeting), None);
        greeting.video_url = "https://v.example/clip.mp4".to_string();
        assert_eq!(media_summary(&greeting).as_deref(), Some("Media: video"));
    }
}
