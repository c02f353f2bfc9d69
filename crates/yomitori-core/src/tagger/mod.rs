//! Morphological tagger abstraction.

#[cfg(feature = "lindera")]
mod ipadic;
mod mecab;

#[cfg(feature = "lindera")]
pub use ipadic::LinderaTagger;
pub use mecab::{parse_mecab_output, MecabTagger};

use serde::{Deserialize, Serialize};

use crate::error::TaggerError;

/// Conjugation form prefix marking continuative (renyoukei) inflections.
pub const CONTINUATIVE_PREFIX: &str = "連用";

/// Conjugation form prefix marking irrealis (mizen) inflections.
pub const IRREALIS_PREFIX: &str = "未然";

/// Feature column layout of a MeCab-format dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureLayout {
    /// pos, pos1, pos2, pos3, ctype, cform, base, reading, pronunciation
    #[default]
    Ipadic,
    /// pos1..pos4, cType, cForm, lForm, lemma, orth, pron, orthBase, ...
    Unidic,
}

impl FeatureLayout {
    fn lemma<'a>(self, features: &[&'a str]) -> Option<&'a str> {
        match self {
            Self::Ipadic => features.get(6).copied(),
            // orthBase keeps the written form; lemma may be a kanji variant
            Self::Unidic => features
                .get(10)
                .or_else(|| features.get(7))
                .copied(),
        }
    }
}

/// Coarse part-of-speech class of a tagged word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Auxiliary,
    Particle,
    Suffix,
    Symbol,
    Other,
}

impl PartOfSpeech {
    /// Map the top-level POS tag of IPADIC or UniDic to a class.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "名詞" | "代名詞" => Self::Noun,
            "動詞" => Self::Verb,
            "形容詞" => Self::Adjective,
            "助動詞" => Self::Auxiliary,
            "助詞" => Self::Particle,
            "接尾辞" | "接尾" => Self::Suffix,
            "記号" | "補助記号" => Self::Symbol,
            _ => Self::Other,
        }
    }

    /// Whether words of this class inflect and may be lemma-substituted.
    pub fn is_inflecting(self) -> bool {
        matches!(self, Self::Verb | Self::Adjective | Self::Auxiliary)
    }
}

/// One word as reported by a morphological tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedWord {
    /// Text as it appears in the input.
    pub surface: String,

    /// Part-of-speech class.
    pub pos: PartOfSpeech,

    /// Conjugation type (e.g. "五段・カ行イ音便").
    pub conjugation_type: Option<String>,

    /// Conjugation form (e.g. "連用形-イ音便", "未然形").
    pub conjugation_form: Option<String>,

    /// Dictionary form reported by the tagger.
    pub lemma: Option<String>,
}

impl TaggedWord {
    pub fn new(surface: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            surface: surface.into(),
            pos,
            conjugation_type: None,
            conjugation_form: None,
            lemma: None,
        }
    }

    /// Build a word from a dictionary feature row.
    ///
    /// Both layouts keep the POS tag in column 0, the conjugation type in 4
    /// and the conjugation form in 5. Empty and "*" columns are dropped.
    pub fn from_features(surface: impl Into<String>, features: &[&str], layout: FeatureLayout) -> Self {
        let pos = features
            .first()
            .map(|tag| PartOfSpeech::from_tag(tag))
            .unwrap_or(PartOfSpeech::Other);

        Self {
            surface: surface.into(),
            pos,
            conjugation_type: feature(features, 4),
            conjugation_form: feature(features, 5),
            lemma: layout.lemma(features).and_then(present).map(str::to_string),
        }
    }

    pub fn with_conjugation_type(mut self, conjugation_type: impl Into<String>) -> Self {
        self.conjugation_type = Some(conjugation_type.into());
        self
    }

    pub fn with_conjugation_form(mut self, conjugation_form: impl Into<String>) -> Self {
        self.conjugation_form = Some(conjugation_form.into());
        self
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    /// Dictionary form, unless missing or a "*" placeholder.
    pub fn dictionary_form(&self) -> Option<&str> {
        self.lemma
            .as_deref()
            .map(str::trim)
            .filter(|lemma| !lemma.is_empty() && *lemma != "*")
    }

    pub fn is_continuative(&self) -> bool {
        self.form_starts_with(CONTINUATIVE_PREFIX)
    }

    pub fn is_irrealis(&self) -> bool {
        self.form_starts_with(IRREALIS_PREFIX)
    }

    fn form_starts_with(&self, prefix: &str) -> bool {
        self.conjugation_form
            .as_deref()
            .is_some_and(|form| form.starts_with(prefix))
    }
}

fn present(value: &str) -> Option<&str> {
    (!value.is_empty() && value != "*").then_some(value)
}

fn feature(features: &[&str], index: usize) -> Option<String> {
    features.get(index).copied().and_then(present).map(str::to_string)
}

/// A morphological tagger producing per-word grammatical features.
pub trait Tagger: Send + Sync {
    /// Tag the text into words.
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, TaggerError>;

    /// Check that the tagger can be used at all.
    fn probe(&self) -> Result<(), TaggerError> {
        self.tag("テスト").map(|_| ())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tagger returning a fixed word list regardless of input.
    pub struct ScriptedTagger {
        words: Vec<TaggedWord>,
        calls: AtomicUsize,
    }

    impl ScriptedTagger {
        pub fn new(words: Vec<TaggedWord>) -> Self {
            Self {
                words,
                calls: AtomicUsize::new(0),
            }
        }

        /// Number of `tag` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Tagger for ScriptedTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedWord>, TaggerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.words.clone())
        }
    }
}
