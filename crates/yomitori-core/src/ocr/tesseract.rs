//! OCR provider driving the Tesseract command-line engine.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, RankingConfig};

use super::preprocessing::ImagePreprocessor;
use super::ranker::OcrRanker;
use super::{OcrCandidate, OcrProvider};

/// Runs `tesseract` once per variant (preprocessing x psm x language) and
/// ranks the resulting readings.
pub struct TesseractOcrProvider {
    command: String,
    languages: Vec<String>,
    page_segmentation_modes: Vec<u32>,
    preprocess: bool,
    preprocessor: ImagePreprocessor,
    ranker: OcrRanker,
    /// Languages reported by `--list-langs`; empty when the probe failed.
    installed_languages: OnceLock<Vec<String>>,
}

impl TesseractOcrProvider {
    pub fn new(config: &OcrConfig, ranking: &RankingConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            languages: config.languages.clone(),
            page_segmentation_modes: config.page_segmentation_modes.clone(),
            preprocess: config.preprocess,
            preprocessor: ImagePreprocessor::new().with_upscale_factor(config.upscale_factor),
            ranker: OcrRanker::new(ranking.clone()),
            installed_languages: OnceLock::new(),
        }
    }

    /// Configured languages that are installed, in configured order.
    ///
    /// When the engine cannot list its languages the configured list is used
    /// as is and the engine itself reports any problem.
    pub fn usable_languages(&self) -> Result<Vec<String>, OcrError> {
        let installed = self
            .installed_languages
            .get_or_init(|| self.list_languages());
        if installed.is_empty() {
            return Ok(self.languages.clone());
        }

        let (usable, missing): (Vec<String>, Vec<String>) = self
            .languages
            .iter()
            .cloned()
            .partition(|lang| installed.contains(lang));
        if usable.is_empty() {
            return Err(OcrError::MissingLanguageData(format!(
                "none of {} installed (available: {})",
                self.languages.join(", "),
                installed.join(", ")
            )));
        }
        if !missing.is_empty() {
            warn!("Tesseract language data not installed: {}", missing.join(", "));
        }
        Ok(usable)
    }

    fn list_languages(&self) -> Vec<String> {
        match Command::new(&self.command).arg("--list-langs").output() {
            Ok(output) if output.status.success() => {
                // Older releases print the list on stderr
                let mut text = String::from_utf8_lossy(&output.stdout).to_string();
                if text.trim().is_empty() {
                    text = String::from_utf8_lossy(&output.stderr).to_string();
                }
                let languages = parse_language_list(&text);
                debug!("Tesseract languages: {}", languages.join(", "));
                languages
            }
            Ok(output) => {
                debug!("tesseract --list-langs exited with {}", output.status);
                Vec::new()
            }
            Err(e) => {
                debug!("Could not list tesseract languages: {}", e);
                Vec::new()
            }
        }
    }

    /// Run one variant and return its reading with the mean word confidence.
    fn run_variant(&self, image: &Path, language: &str, psm: u32) -> Result<(String, f64), OcrError> {
        let output = Command::new(&self.command)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(psm.to_string())
            .arg("tsv")
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::MissingBinary(self.command.clone()),
                _ => OcrError::Engine(format!("failed to run {}: {}", self.command, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(language, &stderr));
        }
        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Readings of every variant, in variant order.
    pub fn read_variants(&self, image: &Path) -> Result<Vec<OcrCandidate>, OcrError> {
        if !image.is_file() {
            return Err(OcrError::Engine(format!(
                "{}: no such file",
                image.display()
            )));
        }

        let languages = self.usable_languages()?;
        let prepared = if self.preprocess {
            Some(self.preprocessor.prepare(image)?)
        } else {
            None
        };

        let mut sources: Vec<(&Path, bool)> = vec![(image, false)];
        if let Some(file) = &prepared {
            sources.push((file.path(), true));
        }

        let mut candidates = Vec::new();
        let mut last_error = None;
        for (source, preprocessed) in sources {
            for &psm in &self.page_segmentation_modes {
                for language in &languages {
                    match self.run_variant(source, language, psm) {
                        Ok((text, confidence)) => candidates.push(
                            OcrCandidate::new(text, confidence)
                                .with_config(format!("psm{}", psm))
                                .with_language(language.clone())
                                .with_preprocessed(preprocessed),
                        ),
                        Err(e @ (OcrError::MissingBinary(_) | OcrError::MissingLanguageData(_))) => {
                            return Err(e);
                        }
                        Err(e) => {
                            warn!("Tesseract variant psm{} {} failed: {}", psm, language, e);
                            last_error = Some(e);
                        }
                    }
                }
            }
        }

        match last_error {
            Some(e) if candidates.is_empty() => Err(e),
            _ => Ok(candidates),
        }
    }
}

impl OcrProvider for TesseractOcrProvider {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract_text(&self, image: &Path) -> Result<String, OcrError> {
        let candidates = self.read_variants(image)?;
        Ok(self.ranker.best(&candidates).unwrap_or_default())
    }

    fn extract_text_candidates(&self, image: &Path, top_n: usize) -> Result<Vec<String>, OcrError> {
        let candidates = self.read_variants(image)?;
        let ranked = self.ranker.rank(&candidates, top_n);
        debug!(
            "{}: {} variants, {} distinct readings kept",
            image.display(),
            candidates.len(),
            ranked.len()
        );
        Ok(ranked)
    }
}

fn classify_failure(language: &str, stderr: &str) -> OcrError {
    if stderr.contains("Failed loading language") || stderr.contains("Error opening data file") {
        OcrError::MissingLanguageData(language.to_string())
    } else {
        OcrError::Engine(stderr.trim().to_string())
    }
}

fn parse_language_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of") && !line.ends_with(':'))
        .map(str::to_string)
        .collect()
}

/// Join word rows of Tesseract TSV output into lines of text.
///
/// Returns the text and the mean word confidence (0 when no words).
pub fn parse_tsv(tsv: &str) -> (String, f64) {
    let mut lines: Vec<((u32, u32, u32, u32), Vec<&str>)> = Vec::new();
    let mut confidence_sum = 0.0;
    let mut word_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let confidence: f64 = cols[10].trim().parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        let key: (u32, u32, u32, u32) = (
            cols[1].parse().unwrap_or(0),
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        match lines.last_mut() {
            Some((last, words)) if *last == key => words.push(text),
            _ => lines.push((key, vec![text])),
        }
        confidence_sum += confidence;
        word_count += 1;
    }

    let text = lines
        .iter()
        .map(|(_, words)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    let confidence = if word_count == 0 {
        0.0
    } else {
        confidence_sum / word_count as f64
    };
    (text, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrFailureKind;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_tsv_groups_lines() {
        let tsv = [
            HEADER,
            "1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t",
            "5\t1\t1\t1\t1\t1\t10\t10\t20\t20\t90.5\t足",
            "5\t1\t1\t1\t1\t2\t30\t10\t20\t20\t80.5\tが",
            "5\t1\t1\t1\t2\t1\t10\t40\t40\t20\t70\t痛い",
            "5\t1\t1\t1\t2\t2\t50\t40\t20\t20\t-1\t ",
        ]
        .join("\n");

        let (text, confidence) = parse_tsv(&tsv);
        assert_eq!(text, "足 が\n痛い");
        assert!((confidence - 80.333).abs() < 0.01);
    }

    #[test]
    fn test_parse_tsv_without_words() {
        assert_eq!(parse_tsv(HEADER), (String::new(), 0.0));
        assert_eq!(parse_tsv(""), (String::new(), 0.0));
    }

    #[test]
    fn test_parse_language_list() {
        let output = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\njpn\njpn_vert\n";
        assert_eq!(parse_language_list(output), vec!["eng", "jpn", "jpn_vert"]);
    }

    #[test]
    fn test_classify_failure() {
        let err = classify_failure("jpn_vert", "Error opening data file /usr/share/tessdata/jpn_vert.traineddata");
        assert!(matches!(err, OcrError::MissingLanguageData(lang) if lang == "jpn_vert"));

        let err = classify_failure("jpn", "Failed loading language 'jpn'");
        assert!(matches!(err, OcrError::MissingLanguageData(_)));

        let err = classify_failure("jpn", "Image too small to scale!!");
        assert!(matches!(err, OcrError::Engine(msg) if msg == "Image too small to scale!!"));
    }

    #[test]
    fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("page.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]))
            .save(&image_path)
            .unwrap();

        let config = OcrConfig {
            tesseract_cmd: "yomitori-no-such-tesseract".to_string(),
            preprocess: false,
            ..OcrConfig::default()
        };
        let provider = TesseractOcrProvider::new(&config, &RankingConfig::default());

        let err = provider.extract_text_candidates(&image_path, 3).unwrap_err();
        assert!(matches!(err, OcrError::MissingBinary(cmd) if cmd == "yomitori-no-such-tesseract"));
    }

    #[test]
    fn test_missing_image() {
        let provider = TesseractOcrProvider::new(&OcrConfig::default(), &RankingConfig::default());
        let err = provider.extract_text(Path::new("/nonexistent/page.png")).unwrap_err();
        assert_eq!(err.kind(), OcrFailureKind::Engine);
    }
}
