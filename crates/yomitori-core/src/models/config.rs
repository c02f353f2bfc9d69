//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tagger::FeatureLayout;

/// Main configuration for the yomitori pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YomitoriConfig {
    /// OCR provider configuration.
    pub ocr: OcrConfig,

    /// OCR reading ranking weights.
    pub ranking: RankingConfig,

    /// Segmenter selection.
    pub segmenter: SegmenterConfig,

    /// Dictionary oracle sources.
    pub dictionary: DictionaryConfig,

    /// Scan behaviour.
    pub scan: ScanConfig,
}

/// Which OCR provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrMode {
    /// Read `<image>.txt` next to each image.
    #[default]
    Sidecar,
    /// Run the Tesseract binary over several variants.
    Tesseract,
}

impl OcrMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sidecar => "sidecar",
            Self::Tesseract => "tesseract",
        }
    }
}

/// OCR provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Provider mode.
    pub mode: OcrMode,

    /// Tesseract executable.
    pub tesseract_cmd: String,

    /// Tesseract language models to try, in order.
    pub languages: Vec<String>,

    /// Page segmentation modes to try.
    pub page_segmentation_modes: Vec<u32>,

    /// Also try a preprocessed (grayscale, upscaled, thresholded) image.
    pub preprocess: bool,

    /// Upscale factor applied during preprocessing.
    pub upscale_factor: u32,

    /// Number of ranked readings kept per image.
    pub candidate_count: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            mode: OcrMode::default(),
            tesseract_cmd: "tesseract".to_string(),
            languages: vec!["jpn".to_string(), "jpn_vert".to_string()],
            page_segmentation_modes: vec![6, 7, 11],
            preprocess: true,
            upscale_factor: 2,
            candidate_count: 8,
        }
    }
}

/// Weights of the OCR reading score.
///
/// Confidence is on Tesseract's 0-100 scale. The very-short penalty exceeds
/// the largest confidence contribution so that one-character readings never
/// outrank a real Japanese reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub confidence_weight: f64,
    pub japanese_weight: f64,
    pub length_weight: f64,
    pub ascii_noise_penalty: f64,
    pub question_mark_penalty: f64,
    pub single_hiragana_penalty: f64,
    pub very_short_penalty: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            confidence_weight: 1.0,
            japanese_weight: 12.0,
            length_weight: 2.0,
            ascii_noise_penalty: 8.0,
            question_mark_penalty: 15.0,
            single_hiragana_penalty: 40.0,
            very_short_penalty: 100.0,
        }
    }
}

/// Morphological tagger configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// MeCab executable; `None` forces regex segmentation.
    pub mecab_cmd: Option<String>,

    /// Feature layout of the MeCab dictionary.
    pub dictionary_format: FeatureLayout,
}

/// Online dictionary backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlineDictionary {
    #[default]
    Off,
    Jisho,
}

impl OnlineDictionary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Jisho => "jisho",
        }
    }
}

/// Dictionary oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Offline JSON dictionary (`word -> {reading, meanings}`).
    pub offline_path: Option<PathBuf>,

    /// Online lookup backend.
    pub online: OnlineDictionary,

    /// Timeout for one online lookup, in seconds.
    pub online_timeout_secs: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            offline_path: None,
            online: OnlineDictionary::default(),
            online_timeout_secs: 8,
        }
    }
}

/// Scan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Process images on the rayon pool.
    pub parallel: bool,

    /// Alternate OCR readings kept in each image record.
    pub alternate_text_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            alternate_text_limit: 5,
        }
    }
}

impl YomitoriConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
