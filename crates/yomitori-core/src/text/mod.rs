//! Script-level text helpers shared by the segmenters and the OCR ranker.

pub mod dedup;
pub mod patterns;
pub mod script;

pub use dedup::{dedup_preserving_order, OrderedSet};
pub use patterns::{is_negative_auxiliary, is_particle};
pub use script::{has_kanji_or_katakana, is_candidate, is_japanese};
