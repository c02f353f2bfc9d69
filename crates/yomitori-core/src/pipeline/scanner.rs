//! Per-text, per-image and per-run candidate aggregation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::dictionary::WordExists;
use crate::error::OcrError;
use crate::models::candidate::NormalizedCandidate;
use crate::models::config::YomitoriConfig;
use crate::models::record::{ImageFailure, ImageRecord, ScanReport};
use crate::ocr::OcrProvider;
use crate::segment::{segment_text, Segmenter};
use crate::text::{is_candidate, OrderedSet};

use super::compound::merge_compounds;
use super::normalizer::Normalizer;

/// Candidates derived from one OCR reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextCandidates {
    /// Surface token sequence, including noise repairs.
    pub surface_tokens: Vec<String>,
    /// Normalized entries in token order.
    pub normalized: Vec<NormalizedCandidate>,
    /// Normalized lemmas then merged compounds, deduplicated.
    pub candidates: Vec<String>,
}

/// Turns OCR readings into ordered, deduplicated vocabulary candidates.
pub struct Scanner {
    normalizer: Normalizer,
    oracle: Option<Arc<dyn WordExists>>,
    candidate_count: usize,
    alternate_text_limit: usize,
    parallel: bool,
}

impl Scanner {
    pub fn new(segmenter: Arc<dyn Segmenter>) -> Self {
        Self {
            normalizer: Normalizer::new(segmenter),
            oracle: None,
            candidate_count: 8,
            alternate_text_limit: 5,
            parallel: true,
        }
    }

    /// Scanner with the OCR and scan settings of `config`.
    pub fn from_config(segmenter: Arc<dyn Segmenter>, config: &YomitoriConfig) -> Self {
        Self::new(segmenter)
            .with_candidate_count(config.ocr.candidate_count)
            .with_alternate_text_limit(config.scan.alternate_text_limit)
            .with_parallel(config.scan.parallel)
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn WordExists>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Number of OCR readings requested per image.
    pub fn with_candidate_count(mut self, count: usize) -> Self {
        self.candidate_count = count.max(1);
        self
    }

    pub fn with_alternate_text_limit(mut self, limit: usize) -> Self {
        self.alternate_text_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    fn oracle(&self) -> Option<&dyn WordExists> {
        self.oracle.as_deref()
    }

    /// Candidates of a single reading.
    pub fn process_text(&self, text: &str) -> TextCandidates {
        let segmentation = segment_text(self.normalizer.segmenter(), text);
        let normalized = self.normalizer.normalize_segmentation(&segmentation, self.oracle());
        let surface_tokens = segmentation.surface;

        let candidate_set: HashSet<String> = surface_tokens
            .iter()
            .filter(|t| is_candidate(t))
            .cloned()
            .collect();
        let merged = merge_compounds(&surface_tokens, &candidate_set, self.oracle());

        let mut candidates: OrderedSet = normalized.iter().map(|e| e.lemma.as_str()).collect();
        candidates.extend(merged);

        TextCandidates {
            surface_tokens,
            normalized,
            candidates: candidates.into_vec(),
        }
    }

    /// Build the record of an image from its ranked readings.
    pub fn process_readings(&self, image: &Path, texts: &[String]) -> ImageRecord {
        let mut surface_tokens = None;
        let mut normalized_candidates = Vec::new();
        let mut candidates = OrderedSet::new();

        for text in texts {
            let result = self.process_text(text);
            candidates.extend(result.candidates);
            normalized_candidates.extend(result.normalized);
            surface_tokens.get_or_insert(result.surface_tokens);
        }

        ImageRecord {
            image: image.to_path_buf(),
            text: texts.first().cloned().unwrap_or_default(),
            alternate_texts: texts
                .iter()
                .skip(1)
                .take(self.alternate_text_limit)
                .cloned()
                .collect(),
            surface_tokens: surface_tokens.unwrap_or_default(),
            normalized_candidates,
            candidates: candidates.into_vec(),
        }
    }

    /// OCR one image and build its record.
    pub fn scan_image(&self, provider: &dyn OcrProvider, image: &Path) -> Result<ImageRecord, OcrError> {
        let texts = provider.extract_text_candidates(image, self.candidate_count)?;
        info!("{}: {} readings", image.display(), texts.len());
        Ok(self.process_readings(image, &texts))
    }

    /// Scan images and aggregate candidates in input order.
    pub fn scan(&self, provider: &dyn OcrProvider, images: &[PathBuf]) -> ScanReport {
        self.scan_with_progress(provider, images, |_| {})
    }

    /// Like [`Scanner::scan`], calling `on_image` after each image finishes.
    ///
    /// With parallel scanning the callback order is unspecified; the report
    /// order is always the input order.
    pub fn scan_with_progress<F>(&self, provider: &dyn OcrProvider, images: &[PathBuf], on_image: F) -> ScanReport
    where
        F: Fn(&Path) + Sync,
    {
        let start = Instant::now();
        info!(
            "Scanning {} images with {} OCR and {} segmentation",
            images.len(),
            provider.name(),
            self.normalizer.segmenter().name()
        );

        let scan_one = |image: &PathBuf| {
            let result = self.scan_image(provider, image);
            on_image(image);
            result
        };
        let results: Vec<Result<ImageRecord, OcrError>> = if self.parallel {
            images.par_iter().map(scan_one).collect()
        } else {
            images.iter().map(scan_one).collect()
        };

        let mut report = ScanReport::default();
        let mut run_candidates = OrderedSet::new();
        for (image, result) in images.iter().zip(results) {
            match result {
                Ok(record) => {
                    run_candidates.extend(record.candidates.iter().map(String::as_str));
                    report.records.push(record);
                }
                Err(e) => {
                    warn!("OCR failed for {}: {}", image.display(), e);
                    report.failures.push(ImageFailure::new(image.clone(), &e));
                }
            }
        }
        report.candidates = run_candidates.into_vec();

        info!(
            "Scan complete: {} candidates from {} images ({} failed) in {}ms",
            report.candidates.len(),
            report.records.len(),
            report.failures.len(),
            start.elapsed().as_millis()
        );
        report
    }
}
