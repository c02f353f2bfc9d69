//! Token segmentation: regex fallback and tagger-backed variants.

mod fallback;
mod morphological;
mod noise;

pub use fallback::RegexFallbackSegmenter;
pub use morphological::{lemma_tokens_from_words, MorphologicalSegmenter};
pub use noise::augment_ocr_noise;

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::config::SegmenterConfig;
use crate::tagger::{MecabTagger, Tagger};
use crate::text::{dedup_preserving_order, is_candidate};

/// Splits raw text into surface and lemma token sequences.
pub trait Segmenter: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Tokens exactly as they appear in the text, in order.
    fn surface_tokens(&self, text: &str) -> Vec<String>;

    /// Tokens with eligible inflections replaced by dictionary forms.
    fn lemma_tokens(&self, text: &str) -> Vec<String>;

    /// Both sequences from one pass over the text.
    fn analyze(&self, text: &str) -> Segmentation {
        Segmentation {
            surface: self.surface_tokens(text),
            lemmas: self.lemma_tokens(text),
        }
    }
}

/// Surface and lemma token sequences of one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub surface: Vec<String>,
    pub lemmas: Vec<String>,
}

/// Single-pass segmentation with OCR-noise repairs appended to both sequences.
pub fn segment_text(segmenter: &dyn Segmenter, text: &str) -> Segmentation {
    let Segmentation { surface, lemmas } = segmenter.analyze(text);
    Segmentation {
        surface: augment_ocr_noise(surface),
        lemmas: augment_ocr_noise(lemmas),
    }
}

/// Surface token sequence with OCR-noise repairs appended.
pub fn token_sequence(segmenter: &dyn Segmenter, text: &str) -> Vec<String> {
    augment_ocr_noise(segmenter.surface_tokens(text))
}

/// Unique vocabulary candidates of a text, in first-seen order.
pub fn extract_candidates(segmenter: &dyn Segmenter, text: &str) -> Vec<String> {
    dedup_preserving_order(
        token_sequence(segmenter, text)
            .into_iter()
            .filter(|token| is_candidate(token)),
    )
}

/// Choose the segmenter for a run.
///
/// A configured MeCab command that answers a probe wins. Otherwise the
/// embedded lindera tagger is used when compiled in, then the regex fallback.
pub fn select_segmenter(config: &SegmenterConfig) -> Arc<dyn Segmenter> {
    if let Some(command) = &config.mecab_cmd {
        let tagger = MecabTagger::new(command.clone(), config.dictionary_format);
        match tagger.probe() {
            Ok(()) => {
                info!("Using morphological segmentation via {}", command);
                return Arc::new(MorphologicalSegmenter::new(Arc::new(tagger)));
            }
            Err(e) => warn!("MeCab unavailable ({})", e),
        }
    }

    if let Some(segmenter) = embedded_segmenter() {
        return segmenter;
    }

    info!("Using regex fallback segmentation");
    Arc::new(RegexFallbackSegmenter::new())
}

#[cfg(feature = "lindera")]
fn embedded_segmenter() -> Option<Arc<dyn Segmenter>> {
    match crate::tagger::LinderaTagger::new() {
        Ok(tagger) => {
            info!("Using morphological segmentation via embedded IPADIC");
            Some(Arc::new(MorphologicalSegmenter::new(Arc::new(tagger))))
        }
        Err(e) => {
            warn!("Embedded tagger unavailable ({})", e);
            None
        }
    }
}

#[cfg(not(feature = "lindera"))]
fn embedded_segmenter() -> Option<Arc<dyn Segmenter>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::testing::ScriptedTagger;
    use crate::tagger::{FeatureLayout, PartOfSpeech, TaggedWord};
    use pretty_assertions::assert_eq;

    fn nouns(surfaces: &[&str]) -> MorphologicalSegmenter {
        let words = surfaces
            .iter()
            .map(|s| TaggedWord::new(*s, PartOfSpeech::Noun))
            .collect();
        MorphologicalSegmenter::new(Arc::new(ScriptedTagger::new(words)))
    }

    #[test]
    fn test_extract_candidates_uses_tagger_tokens() {
        let segmenter = nouns(&["冒険", "に", "行く", "勇者", "勇者"]);
        assert_eq!(
            extract_candidates(&segmenter, "ignored"),
            vec!["冒険", "行く", "勇者"]
        );
    }

    #[test]
    fn test_extract_candidates_fallback() {
        let segmenter = RegexFallbackSegmenter::new();
        assert_eq!(
            extract_candidates(&segmenter, "冒険に行く勇者"),
            vec!["冒険", "行く勇者"]
        );
        assert_eq!(extract_candidates(&segmenter, "足が痛い"), vec!["足", "痛い"]);
    }

    #[test]
    fn test_extract_candidates_repairs_ocr_noise_from_tagger() {
        let segmenter = nouns(&["痛", "も", "い"]);
        let result = extract_candidates(&segmenter, "ignored");
        assert!(result.contains(&"痛い".to_string()));
    }

    #[test]
    fn test_extract_candidates_repairs_ocr_noise_from_regex() {
        let result = extract_candidates(&RegexFallbackSegmenter::new(), "痛もい");
        assert_eq!(result, vec!["痛", "痛い"]);
    }

    #[test]
    fn test_extract_candidates_empty_input() {
        assert!(extract_candidates(&RegexFallbackSegmenter::new(), "").is_empty());
    }

    #[cfg(not(feature = "lindera"))]
    #[test]
    fn test_select_segmenter_without_tagger() {
        let segmenter = select_segmenter(&SegmenterConfig::default());
        assert_eq!(segmenter.name(), "regex_fallback");
    }

    #[cfg(not(feature = "lindera"))]
    #[test]
    fn test_select_segmenter_with_missing_binary_falls_back() {
        let config = SegmenterConfig {
            mecab_cmd: Some("yomitori-no-such-mecab".to_string()),
            dictionary_format: FeatureLayout::Unidic,
        };
        assert_eq!(select_segmenter(&config).name(), "regex_fallback");
    }

    #[cfg(feature = "lindera")]
    #[test]
    fn test_select_segmenter_prefers_embedded_tagger() {
        let config = SegmenterConfig {
            mecab_cmd: Some("yomitori-no-such-mecab".to_string()),
            dictionary_format: FeatureLayout::Ipadic,
        };
        assert_eq!(select_segmenter(&SegmenterConfig::default()).name(), "morphological");
        assert_eq!(select_segmenter(&config).name(), "morphological");
    }
}
