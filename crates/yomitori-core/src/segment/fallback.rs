//! Regex-based segmentation used when no morphological tagger is available.

use crate::text::patterns::{JAPANESE_RUN, PARTICLES};

use super::{Segmentation, Segmenter};

/// Splits text into Japanese-script runs, then at particle characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexFallbackSegmenter;

impl RegexFallbackSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Segment text into an ordered token sequence.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in JAPANESE_RUN.find_iter(text) {
            split_at_particles(chunk.as_str(), &mut tokens);
        }
        tokens
    }
}

fn split_at_particles(chunk: &str, tokens: &mut Vec<String>) {
    let mut current = String::new();
    for c in chunk.chars() {
        if PARTICLES.contains(&c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
}

impl Segmenter for RegexFallbackSegmenter {
    fn name(&self) -> &'static str {
        "regex_fallback"
    }

    fn surface_tokens(&self, text: &str) -> Vec<String> {
        self.segment(text)
    }

    fn lemma_tokens(&self, text: &str) -> Vec<String> {
        self.segment(text)
    }

    fn analyze(&self, text: &str) -> Segmentation {
        let surface = self.segment(text);
        Segmentation {
            lemmas: surface.clone(),
            surface,
        }
    }
}
