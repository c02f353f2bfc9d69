//! OCR providers and reading ranking.

mod preprocessing;
mod ranker;
mod sidecar;
mod tesseract;

pub use preprocessing::ImagePreprocessor;
pub use ranker::{normalize_ocr_text, OcrRanker};
pub use sidecar::SidecarOcrProvider;
pub use tesseract::{parse_tsv, TesseractOcrProvider};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, OcrMode, RankingConfig};

/// One full-text reading of an image under one OCR variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrCandidate {
    /// Raw recognized text.
    pub text: String,

    /// Mean word confidence on the engine's 0-100 scale.
    pub confidence: f64,

    /// Engine settings that produced this reading (e.g. `psm6`).
    pub config: String,

    /// Whether the image was preprocessed.
    pub preprocessed: bool,

    /// Language model used.
    pub language: String,
}

impl OcrCandidate {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
            config: String::new(),
            preprocessed: false,
            language: String::new(),
        }
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = config.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_preprocessed(mut self, preprocessed: bool) -> Self {
        self.preprocessed = preprocessed;
        self
    }
}

/// Source of raw text for an image.
pub trait OcrProvider: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// The most plausible reading of the image (empty if nothing was read).
    fn extract_text(&self, image: &Path) -> Result<String, OcrError>;

    /// Up to `top_n` distinct readings, most plausible first.
    fn extract_text_candidates(&self, image: &Path, top_n: usize) -> Result<Vec<String>, OcrError> {
        let text = self.extract_text(image)?;
        if text.trim().is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![text])
    }
}

/// Build the provider selected by the configuration.
pub fn build_provider(config: &OcrConfig, ranking: &RankingConfig) -> Box<dyn OcrProvider> {
    match config.mode {
        OcrMode::Sidecar => Box::new(SidecarOcrProvider::new()),
        OcrMode::Tesseract => Box::new(TesseractOcrProvider::new(config, ranking)),
    }
}
