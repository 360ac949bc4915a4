//! State types shared between the store and the pattern views.

pub mod pattern;
pub mod processor;
pub mod theme;

pub use pattern::{NoteEvent, PatternParams, MAX_STEPS};
pub use processor::{ProcessorData, StoreState};
pub use theme::{Theme, ThemeColor};
