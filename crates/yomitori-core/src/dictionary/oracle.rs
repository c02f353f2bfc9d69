//! Memoizing word-existence oracle over a chain of dictionaries.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{Dictionary, WordExists};

/// Answers "does this word exist" from the first dictionary that knows it.
///
/// Answers are cached for the oracle's lifetime (one run). Lookup errors
/// count as misses.
#[derive(Default)]
pub struct WordOracle {
    sources: Vec<Box<dyn Dictionary>>,
    cache: Mutex<HashMap<String, bool>>,
}

impl WordOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dictionary; sources are consulted in insertion order.
    pub fn with_source(mut self, source: Box<dyn Dictionary>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of memoized answers.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn lookup_sources(&self, word: &str) -> bool {
        self.sources.iter().any(|source| match source.lookup(word, true) {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                debug!("{} lookup for {} failed: {}", source.name(), word, e);
                false
            }
        })
    }
}

impl WordExists for WordOracle {
    fn exists(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }

        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .copied();
        if let Some(hit) = cached {
            return hit;
        }

        // Lookups run outside the lock so slow sources don't serialize threads
        let hit = self.lookup_sources(word);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(word.to_string(), hit);
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{DictionaryEntry, OfflineJsonDictionary};
    use crate::error::DictionaryError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingDictionary {
        calls: Arc<AtomicUsize>,
        word: &'static str,
    }

    impl Dictionary for CountingDictionary {
        fn name(&self) -> &str {
            "counting"
        }

        fn lookup(
            &self,
            word: &str,
            _exact_match: bool,
        ) -> Result<Option<DictionaryEntry>, DictionaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((word == self.word).then(DictionaryEntry::default))
        }
    }

    struct FailingDictionary;

    impl Dictionary for FailingDictionary {
        fn name(&self) -> &str {
            "failing"
        }

        fn lookup(
            &self,
            _word: &str,
            _exact_match: bool,
        ) -> Result<Option<DictionaryEntry>, DictionaryError> {
            Err(DictionaryError::Request("timed out".to_string()))
        }
    }

    #[test]
    fn test_answers_are_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let oracle = WordOracle::new().with_source(Box::new(CountingDictionary {
            calls: Arc::clone(&calls),
            word: "無駄飯食い",
        }));

        assert!(oracle.exists("無駄飯食い"));
        assert!(oracle.exists("無駄飯食い"));
        assert!(!oracle.exists("足痛い"));
        assert!(!oracle.exists("足痛い"));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(oracle.cached_len(), 2);
    }

    #[test]
    fn test_failing_source_degrades_to_next() {
        let offline = OfflineJsonDictionary::from_entries([("足", DictionaryEntry::default())]);
        let oracle = WordOracle::new()
            .with_source(Box::new(FailingDictionary))
            .with_source(Box::new(offline));

        assert!(oracle.exists("足"));
        assert!(!oracle.exists("手"));
    }

    #[test]
    fn test_no_sources_and_empty_word() {
        let oracle = WordOracle::new();
        assert!(!oracle.exists("足"));
        assert!(!oracle.exists(""));
        assert_eq!(oracle.source_count(), 0);
    }

    #[test]
    fn test_concurrent_lookups() {
        let offline = OfflineJsonDictionary::from_entries([("勇者", DictionaryEntry::default())]);
        let oracle = Arc::new(WordOracle::new().with_source(Box::new(offline)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let oracle = Arc::clone(&oracle);
                std::thread::spawn(move || {
                    let word = if i % 2 == 0 { "勇者" } else { "魔王" };
                    oracle.exists(word)
                })
            })
            .collect();

        let hits = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|hit| *hit)
            .count();
        assert_eq!(hits, 4);
        assert_eq!(oracle.cached_len(), 2);
    }
}
