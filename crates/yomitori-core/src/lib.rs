//! Core library for extracting Japanese vocabulary candidates from OCR text.
//!
//! This crate provides:
//! - Script classification and regex fallback segmentation
//! - Morphological segmentation over an external tagger (MeCab)
//! - Lemma normalization validated against a dictionary oracle
//! - OCR reading ranking (Tesseract, sidecar text files)
//! - Compound reconstruction and ordered, deduplicated aggregation

pub mod dictionary;
pub mod error;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod segment;
pub mod tagger;
pub mod text;

pub use dictionary::{Dictionary, DictionaryEntry, OfflineJsonDictionary, WordExists, WordOracle};
pub use error::{DictionaryError, OcrError, OcrFailureKind, Result, TaggerError, YomitoriError};
pub use models::candidate::{NormalizedCandidate, Reason};
pub use models::config::YomitoriConfig;
pub use models::record::{ImageFailure, ImageRecord, ScanReport};
pub use ocr::{OcrCandidate, OcrProvider, SidecarOcrProvider, TesseractOcrProvider};
pub use pipeline::{merge_compounds, Normalizer, Scanner, TextCandidates};
pub use segment::{
    extract_candidates, segment_text, select_segmenter, MorphologicalSegmenter,
    RegexFallbackSegmenter, Segmentation, Segmenter,
};
#[cfg(feature = "lindera")]
pub use tagger::LinderaTagger;
pub use tagger::{FeatureLayout, MecabTagger, PartOfSpeech, TaggedWord, Tagger};
pub use text::script::is_candidate;
