//! Extract command - run the candidate pipeline over a piece of text.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use serde::Serialize;

use yomitori_core::{select_segmenter, NormalizedCandidate, OfflineJsonDictionary, Scanner, WordOracle};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Japanese text to analyze
    #[arg(required = true)]
    text: String,

    /// Offline JSON dictionary used to validate lemmas and compounds
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// MeCab command for morphological segmentation (overrides configuration)
    #[arg(long)]
    mecab_cmd: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Candidates with their normalization details as JSON
    Json,
    /// One candidate per line
    Text,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    segmenter: &'static str,
    surface_tokens: &'a [String],
    normalized_candidates: &'a [NormalizedCandidate],
    candidates: &'a [String],
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.mecab_cmd.is_some() {
        config.segmenter.mecab_cmd = args.mecab_cmd.clone();
    }

    let segmenter = select_segmenter(&config.segmenter);
    let segmenter_name = segmenter.name();
    let mut scanner = Scanner::new(segmenter);
    if let Some(path) = args.dictionary.as_ref().or(config.dictionary.offline_path.as_ref()) {
        let dictionary = OfflineJsonDictionary::load(path)?;
        scanner = scanner.with_oracle(Arc::new(WordOracle::new().with_source(Box::new(dictionary))));
    }

    let text = args.text.clone();
    let result = tokio::task::spawn_blocking(move || scanner.process_text(&text)).await?;

    match args.format {
        OutputFormat::Json => {
            let output = ExtractOutput {
                segmenter: segmenter_name,
                surface_tokens: &result.surface_tokens,
                normalized_candidates: &result.normalized,
                candidates: &result.candidates,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if result.candidates.is_empty() {
                println!("{} No candidates found.", style("ℹ").blue());
            }
            for candidate in &result.candidates {
                println!("{}", candidate);
            }
        }
    }

    Ok(())
}
