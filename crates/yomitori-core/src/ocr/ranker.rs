//! Scoring and ranking of competing OCR readings.

use std::collections::HashMap;

use crate::models::config::RankingConfig;
use crate::text::patterns::WHITESPACE_RUN;
use crate::text::script::{is_hiragana, is_japanese};

use super::OcrCandidate;

/// Collapse whitespace and remove spaces the engine inserts between
/// Japanese characters.
pub fn normalize_ocr_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let chars: Vec<char> = collapsed.trim().chars().collect();

    let mut normalized = String::with_capacity(collapsed.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' '
            && i > 0
            && i + 1 < chars.len()
            && is_japanese(chars[i - 1])
            && is_japanese(chars[i + 1])
        {
            continue;
        }
        normalized.push(c);
    }
    normalized
}

/// Ranks OCR readings by Japanese plausibility.
#[derive(Debug, Clone, Default)]
pub struct OcrRanker {
    weights: RankingConfig,
}

impl OcrRanker {
    pub fn new(weights: RankingConfig) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingConfig {
        &self.weights
    }

    /// Plausibility score; `-inf` for readings with no visible characters.
    pub fn score(&self, candidate: &OcrCandidate) -> f64 {
        let compact: Vec<char> = normalize_ocr_text(&candidate.text)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if compact.is_empty() {
            return f64::NEG_INFINITY;
        }

        let w = &self.weights;
        let length = compact.len();
        let japanese = compact.iter().filter(|c| is_japanese(**c)).count();
        let ascii_noise = compact.iter().filter(|c| c.is_ascii_alphanumeric()).count();
        let question_marks = compact.iter().filter(|c| matches!(c, '?' | '？')).count();
        let single_hiragana = length == 1 && is_hiragana(compact[0]);

        let mut score = candidate.confidence * w.confidence_weight
            + japanese as f64 * w.japanese_weight
            + length as f64 * w.length_weight
            - ascii_noise as f64 * w.ascii_noise_penalty
            - question_marks as f64 * w.question_mark_penalty;
        if single_hiragana {
            score -= w.single_hiragana_penalty;
        }
        if length <= 1 {
            score -= w.very_short_penalty;
        }
        score
    }

    /// Best `top_n` distinct normalized readings, highest score first.
    ///
    /// Duplicates keep their best score and first-seen position; ties keep
    /// first-seen order.
    pub fn rank(&self, candidates: &[OcrCandidate], top_n: usize) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for candidate in candidates {
            let text = normalize_ocr_text(&candidate.text);
            let score = self.score(candidate);
            match positions.get(&text) {
                Some(&i) => {
                    if score > scored[i].1 {
                        scored[i].1 = score;
                    }
                }
                None => {
                    positions.insert(text.clone(), scored.len());
                    scored.push((text, score));
                }
            }
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .filter(|(_, score)| *score != f64::NEG_INFINITY)
            .take(top_n)
            .map(|(text, _)| text)
            .collect()
    }

    /// The single best reading, if any survives ranking.
    pub fn best(&self, candidates: &[OcrCandidate]) -> Option<String> {
        self.rank(candidates, 1).into_iter().next()
    }
}
