//! Error types for the yomitori-core library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the yomitori library.
#[derive(Error, Debug)]
pub enum YomitoriError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Dictionary lookup error.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Morphological tagger error.
    #[error("tagger error: {0}")]
    Tagger(#[from] TaggerError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by OCR providers.
///
/// Any of these is fatal for the image being processed.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine binary could not be started.
    #[error("OCR engine not found: {0}")]
    MissingBinary(String),

    /// The engine is installed but lacks data for the requested language.
    #[error("OCR language data missing: {0}")]
    MissingLanguageData(String),

    /// Any other failure, including unreadable images.
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

impl OcrError {
    /// Machine-readable kind of this failure.
    pub fn kind(&self) -> OcrFailureKind {
        match self {
            Self::MissingBinary(_) => OcrFailureKind::MissingBinary,
            Self::MissingLanguageData(_) => OcrFailureKind::MissingLanguageData,
            Self::Engine(_) => OcrFailureKind::Engine,
        }
    }
}

/// Kind of an OCR failure as recorded in scan reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrFailureKind {
    MissingBinary,
    MissingLanguageData,
    Engine,
}

impl OcrFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingBinary => "missing_binary",
            Self::MissingLanguageData => "missing_language_data",
            Self::Engine => "engine",
        }
    }
}

/// Errors raised by dictionary backends.
///
/// The word oracle swallows these; they only surface from direct lookups.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Dictionary file could not be read.
    #[error("failed to read dictionary: {0}")]
    Read(String),

    /// Dictionary payload was not in the expected shape.
    #[error("malformed dictionary data: {0}")]
    Malformed(String),

    /// Remote lookup failed.
    #[error("lookup request failed: {0}")]
    Request(String),
}

/// Errors raised by the morphological tagger.
#[derive(Error, Debug)]
pub enum TaggerError {
    /// Tagger binary could not be started.
    #[error("tagger not available: {0}")]
    Unavailable(String),

    /// Tagger ran but returned a failure status.
    #[error("tagger failed: {0}")]
    Failed(String),
}

/// Result type for the yomitori library.
pub type Result<T> = std::result::Result<T, YomitoriError>;
