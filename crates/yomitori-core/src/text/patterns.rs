//! Common patterns and closed word sets for Japanese token extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Maximal run of Hiragana, Katakana or CJK ideographs
    pub static ref JAPANESE_RUN: Regex = Regex::new(
        r"[\u{3040}-\u{30FF}\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}]+"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Single-character grammatical particles used as split points by the
/// fallback segmenter.
pub const PARTICLES: [char; 10] = ['は', 'が', 'を', 'に', 'で', 'と', 'も', 'の', 'へ', 'か'];

/// Classical negative auxiliary spellings that fuse with a preceding verb stem.
pub const NEGATIVE_AUXILIARIES: [&str; 2] = ["ず", "ぬ"];

/// Dictionary forms of causative and passive auxiliaries.
pub const VOICE_AUXILIARIES: [&str; 6] = ["せる", "させる", "す", "さす", "れる", "られる"];

/// Returns true if `token` is exactly one particle character.
pub fn is_particle(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PARTICLES.contains(&c),
        _ => false,
    }
}

/// Returns true if `token` is one of the negative auxiliary spellings.
pub fn is_negative_auxiliary(token: &str) -> bool {
    NEGATIVE_AUXILIARIES.contains(&token)
}
