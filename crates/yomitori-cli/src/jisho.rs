//! Online dictionary backed by the jisho.org search API.

use std::time::Duration;

use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::debug;

use yomitori_core::{Dictionary, DictionaryEntry, DictionaryError};

const SEARCH_URL: &str = "https://jisho.org/api/v1/search/words";

/// Blocking wrapper over the async jisho.org client.
///
/// Lookups block on the runtime handle, so they must run off the runtime's
/// worker threads (inside `spawn_blocking` or on the rayon pool).
pub struct JishoDictionary {
    client: reqwest::Client,
    handle: Handle,
}

impl JishoDictionary {
    pub fn new(timeout: Duration, handle: Handle) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("yomitori/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, handle })
    }

    async fn search(&self, word: &str) -> Result<String, DictionaryError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("keyword", word)])
            .send()
            .await
            .map_err(|e| DictionaryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DictionaryError::Request(format!("HTTP {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| DictionaryError::Request(e.to_string()))
    }
}

impl Dictionary for JishoDictionary {
    fn name(&self) -> &str {
        "jisho"
    }

    fn lookup(&self, word: &str, exact_match: bool) -> Result<Option<DictionaryEntry>, DictionaryError> {
        debug!("jisho lookup: {}", word);
        let body = self.handle.block_on(self.search(word))?;
        parse_search_response(&body, word, exact_match)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    japanese: Vec<JapaneseForm>,
    #[serde(default)]
    senses: Vec<Sense>,
}

#[derive(Deserialize)]
struct JapaneseForm {
    word: Option<String>,
    reading: Option<String>,
}

#[derive(Deserialize)]
struct Sense {
    #[serde(default)]
    english_definitions: Vec<String>,
}

impl SearchItem {
    fn matches(&self, word: &str) -> bool {
        self.japanese.iter().any(|form| {
            form.word.as_deref() == Some(word) || form.reading.as_deref() == Some(word)
        })
    }

    fn into_entry(self) -> DictionaryEntry {
        let reading = self
            .japanese
            .iter()
            .find_map(|form| form.reading.clone())
            .unwrap_or_default();
        let meanings = self
            .senses
            .into_iter()
            .flat_map(|sense| sense.english_definitions)
            .collect();
        DictionaryEntry { reading, meanings }
    }
}

/// Pick the entry for `word` out of a search response body.
pub fn parse_search_response(
    body: &str,
    word: &str,
    exact_match: bool,
) -> Result<Option<DictionaryEntry>, DictionaryError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| DictionaryError::Malformed(e.to_string()))?;

    let mut items = response.data.into_iter();
    let item = if exact_match {
        items.find(|item| item.matches(word))
    } else {
        items.next()
    };
    Ok(item.map(SearchItem::into_entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "meta": {"status": 200},
        "data": [
            {
                "slug": "無駄飯",
                "japanese": [{"word": "無駄飯", "reading": "むだめし"}],
                "senses": [{"english_definitions": ["eating without working"]}]
            },
            {
                "slug": "無駄飯食い",
                "japanese": [{"word": "無駄飯食い", "reading": "むだめしぐい"}],
                "senses": [
                    {"english_definitions": ["freeloader", "idler"]},
                    {"english_definitions": ["good-for-nothing"]}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_exact_match_filters_entries() {
        let entry = parse_search_response(BODY, "無駄飯食い", true).unwrap().unwrap();
        assert_eq!(entry.reading, "むだめしぐい");
        assert_eq!(entry.meanings, vec!["freeloader", "idler", "good-for-nothing"]);

        assert!(parse_search_response(BODY, "無駄", true).unwrap().is_none());
    }

    #[test]
    fn test_exact_match_accepts_reading() {
        let entry = parse_search_response(BODY, "むだめし", true).unwrap().unwrap();
        assert_eq!(entry.meanings, vec!["eating without working"]);
    }

    #[test]
    fn test_inexact_takes_first_result() {
        let entry = parse_search_response(BODY, "無駄", false).unwrap().unwrap();
        assert_eq!(entry.reading, "むだめし");
    }

    #[test]
    fn test_empty_and_malformed_bodies() {
        assert!(parse_search_response(r#"{"data": []}"#, "足", true).unwrap().is_none());
        assert!(matches!(
            parse_search_response("<html>", "足", true),
            Err(DictionaryError::Malformed(_))
        ));
    }
}
