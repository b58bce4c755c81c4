//! Event descriptors and the predefined event catalog

use super::greeting::{Greeting, CUSTOM_EVENT};
use crate::context::Language;

pub const DEFAULT_CUSTOM_EMOJI: &str = "🎉";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Personal,
    Holiday,
    Religious,
    Professional,
    Custom,
}

impl EventCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::Personal => "personal",
            EventCategory::Holiday => "holiday",
            EventCategory::Religious => "religious",
            EventCategory::Professional => "professional",
            EventCategory::Custom => "custom",
        }
    }
}

/// Occasion metadata shown alongside a greeting
#[derive(Debug, Clone, PartialEq)]
pub struct EventType {
    pub id: String,
    pub label: String,
    pub emoji: String,
    pub default_message: String,
    pub category: EventCategory,
}

struct CatalogEntry {
    id: &'static str,
    label: &'static str,
    emoji: &'static str,
    message: &'static str,
    category: EventCategory,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "birthday",
        label: "Birthday",
        emoji: "🎂",
        message: "Wishing you a day filled with happiness and a year filled with joy!",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "anniversary",
        label: "Anniversary",
        emoji: "💕",
        message: "Celebrating your love today and always. Happy anniversary!",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "wedding",
        label: "Wedding",
        emoji: "💍",
        message: "Congratulations on your wedding! Wishing you a lifetime of love.",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "graduation",
        label: "Graduation",
        emoji: "🎓",
        message: "Congratulations, graduate! The future is yours.",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "new-baby",
        label: "New Baby",
        emoji: "👶",
        message: "Welcome to the world, little one!",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "get-well",
        label: "Get Well Soon",
        emoji: "💐",
        message: "Sending healing thoughts your way. Get well soon!",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "thank-you",
        label: "Thank You",
        emoji: "🙏",
        message: "Thank you for everything you do!",
        category: EventCategory::Personal,
    },
    CatalogEntry {
        id: "new-year",
        label: "New Year",
        emoji: "🎆",
        message: "Happy New Year! May the year ahead be your best yet.",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "valentines",
        label: "Valentine's Day",
        emoji: "❤️",
        message: "Happy Valentine's Day to my favorite person!",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "mothers-day",
        label: "Mother's Day",
        emoji: "🌷",
        message: "Happy Mother's Day! Thank you for your endless love.",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "fathers-day",
        label: "Father's Day",
        emoji: "👔",
        message: "Happy Father's Day to the best dad in the world!",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "halloween",
        label: "Halloween",
        emoji: "🎃",
        message: "Have a spooktacular Halloween!",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "thanksgiving",
        label: "Thanksgiving",
        emoji: "🦃",
        message: "Grateful for you this Thanksgiving and always.",
        category: EventCategory::Holiday,
    },
    CatalogEntry {
        id: "christmas",
        label: "Christmas",
        emoji: "🎄",
        message: "Merry Christmas! Wishing you peace, love and joy.",
        category: EventCategory::Religious,
    },
    CatalogEntry {
        id: "diwali",
        label: "Diwali",
        emoji: "🪔",
        message: "May the festival of lights brighten your life. Happy Diwali!",
        category: EventCategory::Religious,
    },
    CatalogEntry {
        id: "holi",
        label: "Holi",
        emoji: "🎨",
        message: "Wishing you a colorful and joyful Holi!",
        category: EventCategory::Religious,
    },
    CatalogEntry {
        id: "eid",
        label: "Eid",
        emoji: "🌙",
        message: "Eid Mubarak! May this Eid bring you peace and happiness.",
        category: EventCategory::Religious,
    },
    CatalogEntry {
        id: "easter",
        label: "Easter",
        emoji: "🐣",
        message: "Happy Easter! Wishing you a season of renewal and joy.",
        category: EventCategory::Religious,
    },
    CatalogEntry {
        id: "congratulations",
        label: "Congratulations",
        emoji: "🏆",
        message: "Congratulations on your well-deserved success!",
        category: EventCategory::Professional,
    },
    CatalogEntry {
        id: "retirement",
        label: "Retirement",
        emoji: "🏖️",
        message: "Happy retirement! Enjoy every moment of this new chapter.",
        category: EventCategory::Professional,
    },
    CatalogEntry {
        id: "promotion",
        label: "Promotion",
        emoji: "📈",
        message: "Congratulations on your promotion. You earned it!",
        category: EventCategory::Professional,
    },
];

impl CatalogEntry {
    fn to_event(&self) -> EventType {
        EventType {
            id: self.id.to_string(),
            label: self.label.to_string(),
            emoji: self.emoji.to_string(),
            default_message: self.message.to_string(),
            category: self.category,
        }
    }
}

/// All predefined events, in catalog order
pub fn catalog() -> Vec<EventType> {
    CATALOG.iter().map(CatalogEntry::to_event).collect()
}

/// Look up a predefined event by id
pub fn lookup(id: &str) -> Option<EventType> {
    CATALOG.iter().find(|e| e.id == id).map(CatalogEntry::to_event)
}

/// Message used when a custom event has no text of its own
pub fn fallback_message(language: Language) -> &'static str {
    match language {
        Language::English => "Wishing you a wonderful celebration!",
        Language::Spanish => "¡Te deseo una celebración maravillosa!",
        Language::French => "Je te souhaite une merveilleuse fête !",
        Language::Hindi => "आपको एक शानदार उत्सव की शुभकामनाएँ!",
    }
}

/// Descriptor for the greeting's event.
///
/// A custom name wins over the event tag. Unknown predefined events yield
/// `None`; callers render a generic card instead.
pub fn resolve(greeting: &Greeting, language: Language) -> Option<EventType> {
    let name = greeting.custom_event_name.trim();
    if !name.is_empty() {
        let emoji = match greeting.custom_event_emoji.trim() {
            "" => DEFAULT_CUSTOM_EMOJI,
            emoji => emoji,
        };
        let default_message = greeting
            .texts
            .first()
            .map(|t| t.content.as_str())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| fallback_message(language));

        return Some(EventType {
            id: CUSTOM_EVENT.to_string(),
            label: name.to_string(),
            emoji: emoji.to_string(),
            default_message: default_message.to_string(),
            category: EventCategory::Custom,
        });
    }

    lookup(&greeting.event_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_predefined() {
        let event = lookup("birthday").unwrap();
        assert_eq!(event.label, "Birthday");
        assert_eq!(event.emoji, "🎂");
        assert_eq!(event.category, EventCategory::Personal);
        assert!(lookup("unknown").is_none());
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let events = catalog();
        let mut ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), events.len());
        assert!(!ids.contains(&CUSTOM_EVENT));
    }

    #[test]
    fn test_resolve_custom_with_defaults() {
        let greeting = Greeting {
            custom_event_name: "Graduation".to_string(),
            ..Greeting::default()
        };
        let event = resolve(&greeting, Language::English).unwrap();
        assert_eq!(event.id, "custom");
        assert_eq!(event.label, "Graduation");
        assert_eq!(event.emoji, "🎉");
        assert_eq!(event.default_message, "Wishing you a wonderful celebration!");
        assert_eq!(event.category, EventCategory::Custom);
    }

    #[test]
    fn test_resolve_custom_uses_first_text() {
        let mut greeting = Greeting::default();
        greeting.set_custom_event("Housewarming", "🏡");
        greeting.add_text("Enjoy the new place!");
        greeting.add_text("See you soon");

        let event = resolve(&greeting, Language::Spanish).unwrap();
        assert_eq!(event.emoji, "🏡");
        assert_eq!(event.default_message, "Enjoy the new place!");
    }

    #[test]
    fn test_resolve_custom_fallback_is_localized() {
        let greeting = Greeting {
            custom_event_name: "Fiesta".to_string(),
            ..Greeting::default()
        };
        let event = resolve(&greeting, Language::Spanish).unwrap();
        assert_eq!(event.default_message, fallback_message(Language::Spanish));
    }

    #[test]
    fn test_resolve_unknown_event() {
        assert!(resolve(&Greeting::for_event("moon-landing"), Language::English).is_none());
        assert!(resolve(&Greeting::default(), Language::English).is_none());
    }
}
