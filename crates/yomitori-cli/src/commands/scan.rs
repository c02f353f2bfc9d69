//! Scan command - extract vocabulary candidates from a set of screenshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, info};

use yomitori_core::models::config::{OcrMode, OnlineDictionary};
use yomitori_core::ocr::build_provider;
use yomitori_core::pipeline::METHOD;
use yomitori_core::{select_segmenter, ImageFailure, ImageRecord, ScanReport, Scanner};

use super::{build_oracle, load_config};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Image file or directory of screenshots (searched recursively)
    #[arg(long, required = true)]
    images: PathBuf,

    /// Identifier of the material the screenshots come from
    #[arg(long, required = true)]
    source: String,

    /// Run identifier (default: current timestamp)
    #[arg(long)]
    run_id: Option<String>,

    /// Directory for run artifacts and the offline dictionary
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// OCR provider (overrides configuration)
    #[arg(long, value_enum)]
    ocr_mode: Option<OcrModeArg>,

    /// Online dictionary fallback for validation (overrides configuration)
    #[arg(long, value_enum)]
    online_dict: Option<OnlineDictArg>,

    /// MeCab command for morphological segmentation (overrides configuration)
    #[arg(long)]
    mecab_cmd: Option<String>,

    /// Process images one at a time
    #[arg(long)]
    sequential: bool,

    /// Keep going when OCR fails for some images
    #[arg(long)]
    continue_on_error: bool,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OcrModeArg {
    /// Read `<image>.txt` next to each image
    Sidecar,
    /// Run Tesseract over several variants
    Tesseract,
}

impl From<OcrModeArg> for OcrMode {
    fn from(arg: OcrModeArg) -> Self {
        match arg {
            OcrModeArg::Sidecar => OcrMode::Sidecar,
            OcrModeArg::Tesseract => OcrMode::Tesseract,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OnlineDictArg {
    Off,
    Jisho,
}

impl From<OnlineDictArg> for OnlineDictionary {
    fn from(arg: OnlineDictArg) -> Self {
        match arg {
            OnlineDictArg::Off => OnlineDictionary::Off,
            OnlineDictArg::Jisho => OnlineDictionary::Jisho,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON run summary
    Json,
    /// CSV of image/candidate pairs
    Csv,
    /// Plain text summary
    Text,
}

/// Persisted result of one scan run.
#[derive(Serialize)]
struct ScanArtifact<'a> {
    source: &'a str,
    run_id: &'a str,
    scanned_at: DateTime<Local>,
    ocr_mode: &'static str,
    ocr_languages: &'a [String],
    normalization_method: &'static str,
    online_dict: &'static str,
    image_count: usize,
    records: &'a [ImageRecord],
    #[serde(skip_serializing_if = "no_failures")]
    failures: &'a [ImageFailure],
    candidates: &'a [String],
}

fn no_failures(failures: &&[ImageFailure]) -> bool {
    failures.is_empty()
}

#[derive(Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    image_count: usize,
    candidate_count: usize,
    failed_count: usize,
    artifact_path: &'a Path,
    candidates: &'a [String],
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(mode) = args.ocr_mode {
        config.ocr.mode = mode.into();
    }
    if let Some(online) = args.online_dict {
        config.dictionary.online = online.into();
    }
    if args.mecab_cmd.is_some() {
        config.segmenter.mecab_cmd = args.mecab_cmd.clone();
    }
    if args.sequential {
        config.scan.parallel = false;
    }

    let images = collect_images(&args.images)?;
    let run_id = args
        .run_id
        .clone()
        .unwrap_or_else(|| Local::now().format("%Y%m%d-%H%M%S").to_string());
    info!("Run {}: {} images from {}", run_id, images.len(), args.images.display());

    let oracle = build_oracle(&config.dictionary, &args.data_dir)?;
    let segmenter = select_segmenter(&config.segmenter);
    let provider = build_provider(&config.ocr, &config.ranking);
    let scanner = Scanner::from_config(segmenter, &config).with_oracle(oracle);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images")?
            .progress_chars("=>-"),
    );

    let progress = pb.clone();
    let report = tokio::task::spawn_blocking(move || {
        scanner.scan_with_progress(provider.as_ref(), &images, |_| progress.inc(1))
    })
    .await?;
    pb.finish_and_clear();

    if !report.failures.is_empty() && !args.continue_on_error {
        for failure in &report.failures {
            error!(
                "OCR failed for {} [{}]: {}",
                failure.image.display(),
                failure.kind.as_str(),
                failure.error
            );
        }
        let first = &report.failures[0];
        anyhow::bail!(
            "OCR failed for {} ({} of {} images failed): {}",
            first.image.display(),
            report.failures.len(),
            report.image_count(),
            first.error
        );
    }

    let artifact = ScanArtifact {
        source: &args.source,
        run_id: &run_id,
        scanned_at: Local::now(),
        ocr_mode: config.ocr.mode.as_str(),
        ocr_languages: &config.ocr.languages,
        normalization_method: METHOD,
        online_dict: config.dictionary.online.as_str(),
        image_count: report.image_count(),
        records: &report.records,
        failures: &report.failures,
        candidates: &report.candidates,
    };
    let artifact_path = write_artifact(&args.data_dir, &run_id, &artifact)?;

    let summary = RunSummary {
        run_id: &run_id,
        image_count: report.image_count(),
        candidate_count: report.candidates.len(),
        failed_count: report.failures.len(),
        artifact_path: &artifact_path,
        candidates: &report.candidates,
    };
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => print!("{}", format_csv(&report)?),
        OutputFormat::Text => print_text(&summary, &report, start),
    }

    Ok(())
}

/// Image files under `path`, sorted.
fn collect_images(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        let pattern = format!("{}/**/*", glob::Pattern::escape(&path.to_string_lossy()));
        glob(&pattern)?.filter_map(|r| r.ok()).collect()
    } else {
        Vec::new()
    };

    files.retain(|p| p.is_file() && is_image(p));
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No image files found at {}", path.display());
    }
    debug!("Collected {} images", files.len());
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn write_artifact(data_dir: &Path, run_id: &str, artifact: &ScanArtifact) -> anyhow::Result<PathBuf> {
    let run_dir = data_dir.join("runs").join(run_id);
    fs::create_dir_all(&run_dir)?;

    let path = run_dir.join("scan.json");
    fs::write(&path, serde_json::to_string_pretty(artifact)?)?;
    debug!("Wrote scan artifact to {}", path.display());
    Ok(path)
}

fn format_csv(report: &ScanReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["image", "candidate"])?;
    for record in &report.records {
        let image = record.image.to_string_lossy();
        for candidate in &record.candidates {
            wtr.write_record([image.as_ref(), candidate.as_str()])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn print_text(summary: &RunSummary, report: &ScanReport, start: Instant) {
    println!(
        "{} Scanned {} images in {:?}",
        style("✓").green(),
        summary.image_count,
        start.elapsed()
    );
    println!(
        "   {} candidates, {} failed",
        style(summary.candidate_count).green(),
        style(summary.failed_count).red()
    );
    println!("   Artifact: {}", summary.artifact_path.display());

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed images:").red());
        for failure in &report.failures {
            println!(
                "  - {} [{}]: {}",
                failure.image.display(),
                failure.kind.as_str(),
                failure.error
            );
        }
    }

    if !summary.candidates.is_empty() {
        println!();
        for candidate in summary.candidates {
            println!("{}", candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chapter2");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("b.PNG"), b"").unwrap();
        fs::write(dir.path().join("a.jpg"), b"").unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        fs::write(nested.join("c.webp"), b"").unwrap();

        let images = collect_images(dir.path()).unwrap();
        let names: Vec<String> = images
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "chapter2/c.webp"]);
    }

    #[test]
    fn test_collect_images_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_images(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No image files found"));
    }
}
