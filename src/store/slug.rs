//! URL-safe greeting identifiers

use crate::models::{CUSTOM_EVENT, DEFAULT_RECEIVER, DEFAULT_SENDER};

const FALLBACK_SLUG: &str = "greeting";
const SUFFIX_LEN: usize = 6;

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Lowercase, hyphen-separated slug of arbitrary text
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug for a greeting from its sender, receiver and event name
pub fn generate(sender: &str, receiver: &str, event: &str) -> String {
    let slug = slugify(&format!(
        "{} {} {}",
        or_default(sender, DEFAULT_SENDER),
        or_default(receiver, DEFAULT_RECEIVER),
        or_default(event, CUSTOM_EVENT),
    ));
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Append a short random suffix so client-generated slugs do not collide
pub fn with_suffix(base: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", base, &random[..SUFFIX_LEN])
}

/// True if `slug` only uses characters `generate` can produce
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_basic() {
        assert_eq!(generate("Ann", "Tom", "Birthday"), "ann-tom-birthday");
    }

    #[test]
    fn test_generate_defaults() {
        assert_eq!(generate("", "  ", ""), "someone-you-custom");
    }

    #[test]
    fn test_collapses_punctuation_runs() {
        assert_eq!(
            generate("  Mary-Jane!! ", "O'Brien", "New  Year's Eve"),
            "mary-jane-o-brien-new-year-s-eve"
        );
    }

    #[test]
    fn test_non_ascii_is_separator() {
        assert_eq!(generate("José", "Zoë", "Diwali 🪔"), "jos-zo-diwali");
        assert_eq!(generate("明", "愛", "🎉"), "greeting");
    }

    #[test]
    fn test_suffix() {
        let slug = with_suffix("ann-tom-birthday");
        assert!(slug.starts_with("ann-tom-birthday-"));
        assert_eq!(slug.len(), "ann-tom-birthday-".len() + SUFFIX_LEN);
        assert!(is_valid(&slug));
        assert_ne!(slug, with_suffix("ann-tom-birthday"));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("ann-tom-birthday"));
        assert!(!is_valid("-ann"));
        assert!(!is_valid("ann--tom"));
        assert!(!is_valid("Ann"));
        assert!(!is_valid(""));
    }

    proptest! {
        #[test]
        fn prop_generate_shape(
            sender in "\\PC{0,20}",
            receiver in "\\PC{0,20}",
            event in "\\PC{0,20}",
        ) {
            let slug = generate(&sender, &receiver, &event);
            prop_assert!(is_valid(&slug), "bad slug {:?}", slug);
        }
    }
}
