//! Tag enums that never fail to deserialize
//!
//! Shared links and stored rows can carry tags written by older or newer
//! clients. Every tag enum accepts any input and falls back to its default
//! member, so a single unknown value never discards the surrounding record.

use serde::{Deserialize, Deserializer};

/// Enum with a fixed set of string tags.
pub trait Tag: Sized + Copy {
    /// Exact (case-insensitive) lookup, `None` for unknown tags.
    fn from_tag(tag: &str) -> Option<Self>;

    fn as_str(self) -> &'static str;
}

/// Deserialize an optional tag where unknown values mean "unset".
pub fn optional_tag<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Tag,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(T::from_tag))
}

/// Declare a tag enum with lenient serde, `Display` and a default member.
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default = $default:ident) {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        #[allow(dead_code)]
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Parse a tag, falling back to the default member.
            pub fn parse_lenient(tag: &str) -> Self {
                <Self as $crate::models::lenient::Tag>::from_tag(tag).unwrap_or_default()
            }

            pub fn as_str(self) -> &'static str {
                <Self as $crate::models::lenient::Tag>::as_str(self)
            }
        }

        impl $crate::models::lenient::Tag for $name {
            fn from_tag(tag: &str) -> Option<Self> {
                let tag = tag.trim();
                $(
                    if tag.eq_ignore_ascii_case($tag) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad($crate::models::lenient::Tag::as_str(*self))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::models::lenient::Tag::as_str(*self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Ok(value.as_str().map($name::parse_lenient).unwrap_or_default())
            }
        }
    };
}

pub(crate) use tag_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    tag_enum! {
        pub enum Flavor (default = Plain) {
            Plain => "plain",
            Spicy => "spicy",
        }
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dish {
        flavor: Flavor,
        #[serde(default, deserialize_with = "optional_tag")]
        topping: Option<Flavor>,
    }

    #[test]
    fn test_known_tag_is_case_insensitive() {
        assert_eq!(Flavor::parse_lenient("SPICY"), Flavor::Spicy);
        assert_eq!(Flavor::parse_lenient(" spicy "), Flavor::Spicy);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_default() {
        let dish: Dish = serde_json::from_str(r#"{"flavor":"smoky","topping":"smoky"}"#).unwrap();
        assert_eq!(dish.flavor, Flavor::Plain);
        assert_eq!(dish.topping, None);
    }

    #[test]
    fn test_non_string_tag_falls_back() {
        let dish: Dish = serde_json::from_str(r#"{"flavor":7,"topping":null}"#).unwrap();
        assert_eq!(dish.flavor, Flavor::Plain);
        assert_eq!(dish.topping, None);
    }

    #[test]
    fn test_serializes_as_tag() {
        let dish = Dish {
            flavor: Flavor::Spicy,
            topping: Some(Flavor::Plain),
        };
        assert_eq!(
            serde_json::to_string(&dish).unwrap(),
            r#"{"flavor":"spicy","topping":"plain"}"#
        );
    }
}
