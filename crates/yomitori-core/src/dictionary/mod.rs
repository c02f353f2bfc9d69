//! Dictionary lookup and the word-existence oracle.

mod offline;
mod oracle;

pub use offline::OfflineJsonDictionary;
pub use oracle::WordOracle;

use serde::{Deserialize, Serialize};

use crate::error::DictionaryError;

/// Payload of a dictionary hit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Kana reading.
    #[serde(default)]
    pub reading: String,

    /// English glosses, most common sense first.
    #[serde(default)]
    pub meanings: Vec<String>,
}

/// A dictionary backend.
pub trait Dictionary: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Look up a word. `Ok(None)` means the word is unknown.
    fn lookup(&self, word: &str, exact_match: bool)
        -> Result<Option<DictionaryEntry>, DictionaryError>;
}

/// Existence check used to validate normalizations and compound merges.
pub trait WordExists: Send + Sync {
    fn exists(&self, word: &str) -> bool;
}

impl<F> WordExists for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, word: &str) -> bool {
        self(word)
    }
}
