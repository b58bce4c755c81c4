//! Data models for greeting cards

pub mod event;
mod greeting;
pub(crate) mod lenient;
mod style;

pub use event::{EventCategory, EventType};
pub use greeting::*;
pub use style::*;
