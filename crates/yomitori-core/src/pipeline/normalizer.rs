//! Rule-based lemma normalization.

use std::collections::HashSet;
use std::sync::Arc;

use crate::dictionary::WordExists;
use crate::models::candidate::{NormalizedCandidate, Reason};
use crate::segment::{segment_text, Segmentation, Segmenter};
use crate::text::is_candidate;

/// Name recorded in every normalized entry.
pub const METHOD: &str = "rule_based";

/// Pairs surface tokens with lemma tokens and picks the form to look up.
#[derive(Clone)]
pub struct Normalizer {
    segmenter: Arc<dyn Segmenter>,
}

impl Normalizer {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        Self { segmenter }
    }

    pub fn method(&self) -> &'static str {
        METHOD
    }

    pub fn segmenter(&self) -> &dyn Segmenter {
        self.segmenter.as_ref()
    }

    /// Normalize every candidate token of `text`.
    ///
    /// Surface and lemma sequences are filtered independently and aligned by
    /// position. With an oracle the lemma, then the surface, is checked for
    /// existence. Emits at most one entry per chosen lemma, first wins.
    pub fn normalize(&self, text: &str, word_exists: Option<&dyn WordExists>) -> Vec<NormalizedCandidate> {
        self.normalize_segmentation(&segment_text(self.segmenter(), text), word_exists)
    }

    /// Like [`Normalizer::normalize`], over an existing segmentation.
    pub fn normalize_segmentation(
        &self,
        segmentation: &Segmentation,
        word_exists: Option<&dyn WordExists>,
    ) -> Vec<NormalizedCandidate> {
        let surfaces: Vec<&String> = segmentation.surface.iter().filter(|t| is_candidate(t)).collect();
        let lemmas: Vec<&String> = segmentation.lemmas.iter().filter(|t| is_candidate(t)).collect();

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (i, &lemma) in lemmas.iter().enumerate() {
            let surface = surfaces.get(i).copied().unwrap_or(lemma);
            let entry = choose_form(surface, lemma, word_exists);
            if seen.insert(entry.lemma.clone()) {
                entries.push(entry);
            }
        }
        entries
    }
}

fn choose_form(surface: &str, lemma: &str, word_exists: Option<&dyn WordExists>) -> NormalizedCandidate {
    if let Some(oracle) = word_exists {
        let mut preferred = vec![lemma];
        if surface != lemma {
            preferred.push(surface);
        }
        if let Some(word) = preferred
            .into_iter()
            .filter(|w| !w.is_empty())
            .find(|w| oracle.exists(w))
        {
            return NormalizedCandidate::new(surface, word, METHOD, Reason::DictionaryValidated);
        }
    }

    let reason = if lemma != surface {
        Reason::LemmaNormalized
    } else {
        Reason::SurfaceFallback
    };
    NormalizedCandidate::new(surface, lemma, METHOD, reason)
}
