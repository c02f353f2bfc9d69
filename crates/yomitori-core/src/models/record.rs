//! Per-image diagnostic records and run-level scan reports.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{OcrError, OcrFailureKind};

use super::candidate::NormalizedCandidate;

/// Diagnostics for one scanned image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Image path.
    pub image: PathBuf,

    /// Most plausible OCR reading (empty if none).
    pub text: String,

    /// Next-best readings, most plausible first.
    pub alternate_texts: Vec<String>,

    /// Surface tokens of the primary reading.
    pub surface_tokens: Vec<String>,

    /// Normalized entries from every reading, in processing order.
    pub normalized_candidates: Vec<NormalizedCandidate>,

    /// Final unique candidates for this image, first-seen order.
    pub candidates: Vec<String>,
}

/// An image whose OCR failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFailure {
    pub image: PathBuf,

    /// Failure class, stable across releases.
    pub kind: OcrFailureKind,

    /// Human-readable error message.
    pub error: String,
}

impl ImageFailure {
    pub fn new(image: impl Into<PathBuf>, error: &OcrError) -> Self {
        Self {
            image: image.into(),
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Result of scanning a set of images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Records of successfully processed images, in input order.
    pub records: Vec<ImageRecord>,

    /// Images whose OCR failed, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ImageFailure>,

    /// Unique candidates across all images, first-seen order.
    pub candidates: Vec<String>,
}

impl ScanReport {
    /// Number of images attempted.
    pub fn image_count(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}
