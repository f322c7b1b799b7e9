use std::time::Duration;

use serde::Deserialize;

use crate::services::vocabulary::{Example, NewWordEntry};

pub const DEFAULT_BASE_URL: &str = "https://dictionary.skyeng.ru/api/public/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the public dictionary API: search by text, then fetch
/// detailed meanings by id. Both calls are network-bound and fallible;
/// failures surface as a transient "try again later" condition.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary service unavailable: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("failed to build http client: {0}")]
    Init(reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub meanings: Vec<MeaningPreview>,
}

/// The meaning summary embedded in search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningPreview {
    pub id: i64,
    #[serde(default)]
    pub translation: Option<Translation>,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub part_of_speech_code: Option<String>,
    #[serde(default)]
    pub sound_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A detailed meaning from the `/meanings` endpoint, including examples.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub translation: Option<Translation>,
    #[serde(default)]
    pub part_of_speech_code: Option<String>,
    #[serde(default)]
    pub examples: Vec<ApiExample>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiExample {
    pub text: String,
    #[serde(default)]
    pub translation: Option<Translation>,
}

impl DictionaryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DictionaryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DictionaryError::Init)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, DictionaryError> {
        let url = format!("{}/words/search", self.base_url);
        let results = self
            .http
            .get(&url)
            .query(&[("search", query)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<SearchResult>>()
            .await?;

        tracing::debug!(query, hits = results.len(), "dictionary search");
        Ok(results)
    }

    /// Fetches detailed meanings by id. Best-effort: the API may return
    /// fewer entries than requested; empty input short-circuits without a
    /// network call.
    pub async fn fetch_meanings(&self, ids: &[i64]) -> Result<Vec<Meaning>, DictionaryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/meanings", self.base_url);
        let meanings = self
            .http
            .get(&url)
            .query(&[("ids", joined.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Meaning>>()
            .await?;

        Ok(meanings)
    }
}

impl NewWordEntry {
    /// Normalizes a search-result meaning into the stored entry shape.
    /// Returns None when the meaning carries no translation text.
    pub fn from_preview(headword: &str, preview: &MeaningPreview) -> Option<Self> {
        let translation = preview
            .translation
            .as_ref()
            .and_then(|t| t.text.clone())
            .filter(|t| !t.is_empty())?;

        Some(Self {
            word: headword.to_string(),
            translation,
            transcription: preview.transcription.clone().filter(|t| !t.is_empty()),
            part_of_speech: preview.part_of_speech_code.clone(),
            examples: Vec::new(),
        })
    }

    /// Folds example sentences from a detailed meaning into the entry.
    pub fn with_examples(mut self, meaning: &Meaning) -> Self {
        self.examples = meaning
            .examples
            .iter()
            .map(|ex| Example {
                text: ex.text.clone(),
                translation: ex.translation.as_ref().and_then(|t| t.text.clone()),
            })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_without_translation_is_skipped() {
        let preview = MeaningPreview {
            id: 1,
            translation: None,
            transcription: None,
            part_of_speech_code: None,
            sound_url: None,
            image_url: None,
        };
        assert!(NewWordEntry::from_preview("hello", &preview).is_none());
    }

    #[test]
    fn preview_normalizes_fields() {
        let preview = MeaningPreview {
            id: 1,
            translation: Some(Translation {
                text: Some("привет".to_string()),
                note: None,
            }),
            transcription: Some("həˈləʊ".to_string()),
            part_of_speech_code: Some("n".to_string()),
            sound_url: None,
            image_url: None,
        };
        let entry = NewWordEntry::from_preview("hello", &preview).unwrap();
        assert_eq!(entry.word, "hello");
        assert_eq!(entry.translation, "привет");
        assert_eq!(entry.transcription.as_deref(), Some("həˈləʊ"));
    }

    #[tokio::test]
    async fn empty_ids_fetch_skips_the_network() {
        let client = DictionaryClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let meanings = client.fetch_meanings(&[]).await.unwrap();
        assert!(meanings.is_empty());
    }
}
