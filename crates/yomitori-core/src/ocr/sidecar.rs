//! OCR provider that reads pre-extracted text from sidecar files.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::OcrError;

use super::OcrProvider;

/// Reads `<image stem>.txt` next to each image.
///
/// Useful for screenshots already transcribed by another tool, and for
/// exercising the pipeline without an OCR engine installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarOcrProvider;

impl SidecarOcrProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn sidecar_path(image: &Path) -> PathBuf {
        image.with_extension("txt")
    }
}

impl OcrProvider for SidecarOcrProvider {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    fn extract_text(&self, image: &Path) -> Result<String, OcrError> {
        let path = Self::sidecar_path(image);
        if !path.exists() {
            debug!("No sidecar text for {}", image.display());
            return Ok(String::new());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| OcrError::Engine(format!("{}: {}", path.display(), e)))?;
        Ok(content.trim_start_matches('\u{feff}').to_string())
    }
}
