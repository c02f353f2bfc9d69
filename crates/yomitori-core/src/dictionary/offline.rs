//! Offline dictionary backed by a JSON table.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::DictionaryError;

use super::{Dictionary, DictionaryEntry};

/// Dictionary loaded once from a `word -> {reading, meanings}` JSON object.
#[derive(Debug, Clone, Default)]
pub struct OfflineJsonDictionary {
    entries: BTreeMap<String, DictionaryEntry>,
}

impl OfflineJsonDictionary {
    /// Load from a file; a missing file gives an empty dictionary.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        if !path.exists() {
            debug!("Offline dictionary not found at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DictionaryError::Read(format!("{}: {}", path.display(), e)))?;
        let dictionary = Self::from_json(&content)?;
        info!(
            "Loaded offline dictionary with {} entries from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Parse the JSON table, tolerating a UTF-8 byte order mark.
    pub fn from_json(content: &str) -> Result<Self, DictionaryError> {
        let content = content.trim_start_matches('\u{feff}');
        let entries: BTreeMap<String, DictionaryEntry> = serde_json::from_str(content)
            .map_err(|e| DictionaryError::Malformed(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DictionaryEntry)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dictionary for OfflineJsonDictionary {
    fn name(&self) -> &str {
        "offline"
    }

    fn lookup(
        &self,
        word: &str,
        exact_match: bool,
    ) -> Result<Option<DictionaryEntry>, DictionaryError> {
        if let Some(entry) = self.entries.get(word) {
            return Ok(Some(entry.clone()));
        }
        if exact_match || word.is_empty() {
            return Ok(None);
        }

        // Prefix match in key order keeps inexact lookups deterministic
        Ok(self
            .entries
            .range(word.to_string()..)
            .take_while(|(key, _)| key.starts_with(word))
            .map(|(_, entry)| entry.clone())
            .next())
    }
}
