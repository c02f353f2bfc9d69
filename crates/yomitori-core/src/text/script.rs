//! Unicode script classification for Japanese tokens.

/// Hiragana block (U+3040 - U+309F).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Katakana block (U+30A0 - U+30FF), including the long vowel mark.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// CJK unified ideographs and extension A.
pub fn is_kanji(c: char) -> bool {
    ('\u{3400}'..='\u{4DBF}').contains(&c) || ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Any character of the three Japanese scripts.
pub fn is_japanese(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || is_kanji(c)
}

/// True if the token carries at least one katakana or kanji character.
pub fn has_kanji_or_katakana(token: &str) -> bool {
    token.chars().any(|c| is_kanji(c) || is_katakana(c))
}

/// Decide whether a token is a plausible vocabulary candidate.
///
/// Kanji- or katakana-bearing tokens are always accepted. Tokens without them
/// need at least two hiragana, since single kana are almost always particles
/// or OCR noise.
pub fn is_candidate(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }

    if has_kanji_or_katakana(token) {
        return true;
    }

    token.chars().filter(|c| is_hiragana(*c)).count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(!is_candidate(""));
        assert!(!is_candidate("   "));
        assert!(!is_candidate("\u{3000}"));
    }

    #[test]
    fn test_rejects_non_japanese() {
        assert!(!is_candidate("abc"));
        assert!(!is_candidate("777"));
        assert!(!is_candidate("???"));
    }

    #[test]
    fn test_single_hiragana_rejected() {
        assert!(!is_candidate("が"));
        assert!(!is_candidate("い"));
    }

    #[test]
    fn test_multi_hiragana_accepted() {
        assert!(is_candidate("ある"));
        assert!(is_candidate("れる"));
    }

    #[test]
    fn test_kanji_or_katakana_accepted_regardless_of_length() {
        assert!(is_candidate("足"));
        assert!(is_candidate("ア"));
        assert!(is_candidate("痛い"));
        assert!(is_candidate("ゲーム"));
    }

    #[test]
    fn test_script_predicates() {
        assert!(is_hiragana('あ'));
        assert!(!is_hiragana('ア'));
        assert!(is_katakana('ー'));
        assert!(is_kanji('足'));
        assert!(is_kanji('㐂'));
        assert!(!is_japanese('A'));
        assert!(!is_japanese('？'));
    }
}
