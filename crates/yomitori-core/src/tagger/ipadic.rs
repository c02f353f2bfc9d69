//! In-process tagger over lindera's embedded IPADIC.

use lindera::dictionary::{load_embedded_dictionary, DictionaryKind};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter as LinderaSegmenter;
use lindera::tokenizer::Tokenizer;
use tracing::debug;

use crate::error::TaggerError;

use super::{FeatureLayout, TaggedWord, Tagger};

/// Tagger backed by lindera with the IPADIC dictionary compiled in.
pub struct LinderaTagger {
    tokenizer: Tokenizer,
}

impl LinderaTagger {
    pub fn new() -> Result<Self, TaggerError> {
        let dictionary = load_embedded_dictionary(DictionaryKind::IPADIC)
            .map_err(|e| TaggerError::Unavailable(format!("lindera IPADIC: {}", e)))?;
        let segmenter = LinderaSegmenter::new(Mode::Normal, dictionary, None);

        Ok(Self {
            tokenizer: Tokenizer::new(segmenter),
        })
    }
}

impl Tagger for LinderaTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, TaggerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| TaggerError::Failed(e.to_string()))?;

        let words: Vec<TaggedWord> = tokens
            .iter_mut()
            .filter(|token| !token.surface.trim().is_empty())
            .map(|token| {
                let surface = token.surface.to_string();
                TaggedWord::from_features(surface, &token.details(), FeatureLayout::Ipadic)
            })
            .collect();
        debug!("lindera tagged {} words", words.len());
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{MorphologicalSegmenter, Segmenter};
    use crate::tagger::PartOfSpeech;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn segmenter() -> MorphologicalSegmenter {
        MorphologicalSegmenter::new(Arc::new(LinderaTagger::new().unwrap()))
    }

    #[test]
    fn test_ipadic_columns_are_mapped() {
        let words = LinderaTagger::new().unwrap().tag("役立たず").unwrap();
        assert_eq!(words[0].surface, "役立た");
        assert_eq!(words[0].pos, PartOfSpeech::Verb);
        assert!(words[0].is_irrealis());
        assert_eq!(words[0].dictionary_form(), Some("役立つ"));
        assert_eq!(words[1].surface, "ず");
        assert_eq!(words[1].pos, PartOfSpeech::Auxiliary);
    }

    #[test]
    fn test_causative_passive_collapses() {
        assert_eq!(segmenter().lemma_tokens("歩かされる"), vec!["歩く"]);
    }

    #[test]
    fn test_negative_auxiliary_fuses() {
        assert_eq!(segmenter().lemma_tokens("役立たず"), vec!["役立たず"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(LinderaTagger::new().unwrap().tag(" ").unwrap().is_empty());
    }
}
