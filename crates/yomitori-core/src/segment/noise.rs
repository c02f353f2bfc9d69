//! OCR noise repair over token sequences.

use crate::text::{has_kanji_or_katakana, is_particle};

/// Append repaired i-adjective candidates for `stem, particle, い` windows.
///
/// OCR sometimes inserts a stray kana between an adjective stem and its final
/// い, which the segmenters then read as a particle. The original tokens are
/// kept; repairs go after them in window order.
pub fn augment_ocr_noise(mut tokens: Vec<String>) -> Vec<String> {
    let repairs: Vec<String> = tokens
        .windows(3)
        .filter(|w| has_kanji_or_katakana(&w[0]) && is_particle(&w[1]) && w[2] == "い")
        .map(|w| format!("{}{}", w[0], w[2]))
        .collect();

    tokens.extend(repairs);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_repairs_inserted_particle() {
        let result = augment_ocr_noise(tokens(&["痛", "も", "い"]));
        assert_eq!(result, tokens(&["痛", "も", "い", "痛い"]));
    }

    #[test]
    fn test_requires_kanji_or_katakana_stem() {
        let result = augment_ocr_noise(tokens(&["あ", "も", "い"]));
        assert_eq!(result, tokens(&["あ", "も", "い"]));
    }

    #[test]
    fn test_requires_particle_in_middle() {
        let result = augment_ocr_noise(tokens(&["痛", "く", "い"]));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_repairs_are_appended_not_interleaved() {
        let result = augment_ocr_noise(tokens(&["痛", "も", "い", "勇者", "寒", "が", "い"]));
        assert_eq!(
            result,
            tokens(&["痛", "も", "い", "勇者", "寒", "が", "い", "痛い", "寒い"])
        );
    }

    #[test]
    fn test_short_sequences_untouched() {
        assert!(augment_ocr_noise(Vec::new()).is_empty());
        assert_eq!(augment_ocr_noise(tokens(&["痛", "も"])), tokens(&["痛", "も"]));
    }
}
