//! Viewer context passed explicitly to decoding and preview

use crate::models::lenient::tag_enum;

tag_enum! {
    /// Interface language of the person viewing a card
    pub enum Language (default = English) {
        English => "en",
        Spanish => "es",
        French => "fr",
        Hindi => "hi",
    }
}

/// Ambient settings of the viewer, as opposed to the card itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    pub language: Language,
    /// Theme used when a card does not name its own
    pub theme: String,
}

impl Context {
    pub fn new(language: Language, theme: &str) -> Self {
        Self {
            language,
            theme: theme.to_string(),
        }
    }

    /// Theme a card is shown with
    pub fn theme_for<'a>(&'a self, card_theme: &'a str) -> &'a str {
        if card_theme.trim().is_empty() {
            &self.theme
        } else {
            card_theme
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        assert_eq!(Language::parse_lenient("fr"), Language::French);
        assert_eq!(Language::parse_lenient("klingon"), Language::English);
        assert_eq!(Language::Hindi.as_str(), "hi");
    }

    #[test]
    fn test_theme_for() {
        let ctx = Context::new(Language::English, "pastel");
        assert_eq!(ctx.theme_for(""), "pastel");
        assert_eq!(ctx.theme_for("neon"), "neon");
    }
}
