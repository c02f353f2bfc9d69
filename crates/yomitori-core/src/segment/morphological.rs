//! Tagger-backed segmentation with restricted lemma substitution.

use std::sync::Arc;

use tracing::warn;

use crate::tagger::{PartOfSpeech, TaggedWord, Tagger};
use crate::text::patterns::{is_negative_auxiliary, VOICE_AUXILIARIES};

use super::{RegexFallbackSegmenter, Segmentation, Segmenter};

/// Segmenter over an external morphological tagger.
///
/// A tagger failure on a given text falls back to regex segmentation for
/// that text only.
pub struct MorphologicalSegmenter {
    tagger: Arc<dyn Tagger>,
    fallback: RegexFallbackSegmenter,
}

impl MorphologicalSegmenter {
    pub fn new(tagger: Arc<dyn Tagger>) -> Self {
        Self {
            tagger,
            fallback: RegexFallbackSegmenter::new(),
        }
    }

    fn tag(&self, text: &str) -> Option<Vec<TaggedWord>> {
        match self.tagger.tag(text) {
            Ok(words) => Some(words),
            Err(e) => {
                warn!("Tagger failed, using regex segmentation: {}", e);
                None
            }
        }
    }
}

impl Segmenter for MorphologicalSegmenter {
    fn name(&self) -> &'static str {
        "morphological"
    }

    fn surface_tokens(&self, text: &str) -> Vec<String> {
        match self.tag(text) {
            Some(words) => words.into_iter().map(|w| w.surface).collect(),
            None => self.fallback.segment(text),
        }
    }

    fn lemma_tokens(&self, text: &str) -> Vec<String> {
        match self.tag(text) {
            Some(words) => lemma_tokens_from_words(&words),
            None => self.fallback.segment(text),
        }
    }

    fn analyze(&self, text: &str) -> Segmentation {
        match self.tag(text) {
            Some(words) => Segmentation {
                lemmas: lemma_tokens_from_words(&words),
                surface: words.into_iter().map(|w| w.surface).collect(),
            },
            None => self.fallback.analyze(text),
        }
    }
}

/// Build the lemma-oriented token sequence from tagged words.
///
/// Only continuative inflections of verbs, adjectives and auxiliaries are
/// replaced by their dictionary form. An irrealis verb fuses with a following
/// ず/ぬ, and collapses to its dictionary form when followed by causative or
/// passive auxiliaries.
pub fn lemma_tokens_from_words(words: &[TaggedWord]) -> Vec<String> {
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let word = &words[i];

        if word.pos == PartOfSpeech::Verb && word.is_irrealis() {
            if let Some(next) = words.get(i + 1) {
                if next.pos == PartOfSpeech::Auxiliary && is_negative_auxiliary(&next.surface) {
                    tokens.push(format!("{}{}", word.surface, next.surface));
                    i += 2;
                    continue;
                }
            }

            let chain = words[i + 1..]
                .iter()
                .take_while(|w| is_voice_auxiliary(w))
                .count();
            if chain > 0 {
                let base = word.dictionary_form().unwrap_or(&word.surface);
                tokens.push(base.to_string());
                i += 1 + chain;
                continue;
            }
        }

        tokens.push(lemma_or_surface(word).to_string());
        i += 1;
    }

    tokens
}

fn lemma_or_surface(word: &TaggedWord) -> &str {
    if word.pos.is_inflecting() && word.is_continuative() {
        word.dictionary_form().unwrap_or(&word.surface)
    } else {
        &word.surface
    }
}

fn is_voice_auxiliary(word: &TaggedWord) -> bool {
    matches!(
        word.pos,
        PartOfSpeech::Verb | PartOfSpeech::Auxiliary | PartOfSpeech::Suffix
    ) && word
        .dictionary_form()
        .is_some_and(|lemma| VOICE_AUXILIARIES.contains(&lemma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaggerError;
    use crate::tagger::testing::ScriptedTagger;
    use pretty_assertions::assert_eq;

    fn verb(surface: &str, form: &str, lemma: &str) -> TaggedWord {
        TaggedWord::new(surface, PartOfSpeech::Verb)
            .with_conjugation_form(form)
            .with_lemma(lemma)
    }

    fn aux(surface: &str, form: &str, lemma: &str) -> TaggedWord {
        TaggedWord::new(surface, PartOfSpeech::Auxiliary)
            .with_conjugation_form(form)
            .with_lemma(lemma)
    }

    #[test]
    fn test_continuative_verb_is_lemmatized() {
        let words = vec![verb("焼い", "連用タ接続", "焼く"), aux("た", "基本形", "た")];
        assert_eq!(lemma_tokens_from_words(&words), vec!["焼く", "た"]);
    }

    #[test]
    fn test_lone_irrealis_verb_keeps_surface() {
        let words = vec![verb("役立た", "未然形", "役立つ")];
        assert_eq!(lemma_tokens_from_words(&words), vec!["役立た"]);
    }

    #[test]
    fn test_attributive_and_nouns_keep_surface() {
        let words = vec![
            TaggedWord::new("勇者", PartOfSpeech::Noun).with_lemma("勇者"),
            verb("行く", "連体形", "行く"),
            TaggedWord::new("たち", PartOfSpeech::Suffix)
                .with_conjugation_form("連用形")
                .with_lemma("達"),
        ];
        assert_eq!(lemma_tokens_from_words(&words), vec!["勇者", "行く", "たち"]);
    }

    #[test]
    fn test_placeholder_lemma_falls_back_to_surface() {
        let words = vec![verb("ググっ", "連用タ接続", "*")];
        assert_eq!(lemma_tokens_from_words(&words), vec!["ググっ"]);
    }

    #[test]
    fn test_negative_auxiliary_fusion() {
        let words = vec![verb("役立た", "未然形", "役立つ"), aux("ず", "連用ニ接続", "ぬ")];
        assert_eq!(lemma_tokens_from_words(&words), vec!["役立たず"]);

        let words = vec![verb("知ら", "未然形", "知る"), aux("ぬ", "基本形", "ぬ"), TaggedWord::new("が", PartOfSpeech::Particle)];
        assert_eq!(lemma_tokens_from_words(&words), vec!["知らぬ", "が"]);
    }

    #[test]
    fn test_fusion_requires_auxiliary_pos() {
        let words = vec![
            verb("役立た", "未然形", "役立つ"),
            TaggedWord::new("ず", PartOfSpeech::Other),
        ];
        assert_eq!(lemma_tokens_from_words(&words), vec!["役立た", "ず"]);
    }

    #[test]
    fn test_causative_passive_chain_collapses() {
        let words = vec![
            verb("歩か", "未然形", "歩く"),
            TaggedWord::new("さ", PartOfSpeech::Verb)
                .with_conjugation_form("未然形")
                .with_lemma("す"),
            TaggedWord::new("れる", PartOfSpeech::Verb)
                .with_conjugation_form("基本形")
                .with_lemma("れる"),
        ];
        assert_eq!(lemma_tokens_from_words(&words), vec!["歩く"]);
    }

    #[test]
    fn test_passive_auxiliary_then_past() {
        let words = vec![
            verb("奪わ", "未然形", "奪う"),
            aux("れ", "連用形", "れる"),
            aux("た", "基本形", "た"),
        ];
        assert_eq!(lemma_tokens_from_words(&words), vec!["奪う", "た"]);
    }

    #[test]
    fn test_segmenter_surface_tokens_are_verbatim() {
        let tagger = ScriptedTagger::new(vec![verb("焼い", "連用タ接続", "焼く"), aux("た", "基本形", "た")]);
        let segmenter = MorphologicalSegmenter::new(Arc::new(tagger));
        assert_eq!(segmenter.surface_tokens("ignored"), vec!["焼い", "た"]);
        assert_eq!(segmenter.lemma_tokens("ignored"), vec!["焼く", "た"]);
    }

    struct BrokenTagger;

    impl Tagger for BrokenTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedWord>, TaggerError> {
            Err(TaggerError::Failed("boom".to_string()))
        }
    }

    #[test]
    fn test_tagger_failure_degrades_to_regex() {
        let segmenter = MorphologicalSegmenter::new(Arc::new(BrokenTagger));
        assert_eq!(segmenter.surface_tokens("足が痛い"), vec!["足", "が", "痛い"]);
        assert_eq!(segmenter.lemma_tokens("足が痛い"), vec!["足", "が", "痛い"]);
    }

    #[test]
    fn test_analyze_tags_once() {
        let tagger = Arc::new(ScriptedTagger::new(vec![
            verb("焼い", "連用タ接続", "焼く"),
            aux("た", "基本形", "た"),
        ]));
        let segmenter = MorphologicalSegmenter::new(tagger.clone());

        let segmentation = segmenter.analyze("焼いた");
        assert_eq!(segmentation.surface, vec!["焼い", "た"]);
        assert_eq!(segmentation.lemmas, vec!["焼く", "た"]);
        assert_eq!(tagger.calls(), 1);
    }

    #[test]
    fn test_analyze_failure_uses_regex_for_both_sequences() {
        let segmenter = MorphologicalSegmenter::new(Arc::new(BrokenTagger));
        let segmentation = segmenter.analyze("足が痛い");
        assert_eq!(segmentation.surface, vec!["足", "が", "痛い"]);
        assert_eq!(segmentation.lemmas, segmentation.surface);
    }
}
