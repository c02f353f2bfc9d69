//! CLI subcommands and the setup they share.

pub mod config;
pub mod extract;
pub mod scan;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use yomitori_core::models::config::{DictionaryConfig, OnlineDictionary};
use yomitori_core::{OfflineJsonDictionary, WordOracle, YomitoriConfig};

use crate::jisho::JishoDictionary;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yomitori")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<YomitoriConfig> {
    if let Some(path) = config_path {
        return Ok(YomitoriConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(YomitoriConfig::from_file(&default_path)?)
    } else {
        Ok(YomitoriConfig::default())
    }
}

/// Build the word oracle: offline dictionary first, then the online backend.
///
/// Must be called from within the tokio runtime when an online backend is
/// configured.
pub fn build_oracle(config: &DictionaryConfig, data_dir: &Path) -> anyhow::Result<Arc<WordOracle>> {
    let offline_path = config
        .offline_path
        .clone()
        .unwrap_or_else(|| data_dir.join("dictionaries").join("offline.json"));
    let mut oracle = WordOracle::new().with_source(Box::new(OfflineJsonDictionary::load(&offline_path)?));

    if config.online == OnlineDictionary::Jisho {
        info!("Online dictionary fallback: jisho.org");
        let jisho = JishoDictionary::new(
            Duration::from_secs(config.online_timeout_secs),
            tokio::runtime::Handle::current(),
        )?;
        oracle = oracle.with_source(Box::new(jisho));
    }

    Ok(Arc::new(oracle))
}
