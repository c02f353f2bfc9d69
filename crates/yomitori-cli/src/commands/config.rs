//! Config command - inspect and edit the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use yomitori_core::YomitoriConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g. "ocr.candidate_count")
    Get { key: String },

    /// Change one value; VALUE is parsed as JSON, else taken as a string
    Set { key: String, value: String },

    /// Show the configuration file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            let config = read_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { force } => init(&path, force)?,
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(read_or_default(&path)?)?;
            let value = key
                .split('.')
                .try_fold(&json, |node, part| node.get(part))
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Set { key, value } => set(&path, &key, &value)?,
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!("Run 'yomitori config init' to create it.");
            }
        }
    }

    Ok(())
}

fn read_or_default(path: &Path) -> anyhow::Result<YomitoriConfig> {
    if path.exists() {
        Ok(YomitoriConfig::from_file(path)?)
    } else {
        eprintln!("{} No config file at {}, using defaults.", style("ℹ").blue(), path.display());
        Ok(YomitoriConfig::default())
    }
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    YomitoriConfig::default().save(path)?;
    println!("{} Created configuration file at {}", style("✓").green(), path.display());
    Ok(())
}

fn set(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
    let value: Value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let mut json = serde_json::to_value(read_or_default(path)?)?;

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };
    let mut node = &mut json;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }
    let section = node
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;
    if !section.contains_key(leaf) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    section.insert(leaf.to_string(), value.clone());

    // Round-trip so a bad value is rejected before anything is written
    let config: YomitoriConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!("{} Set {} = {}", style("✓").green(), key, serde_json::to_string(&value)?);
    Ok(())
}
