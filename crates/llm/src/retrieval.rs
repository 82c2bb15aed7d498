use crate::error::{LlmError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const DEFAULT_MAX_RESULTS: usize = 8;

/// One piece of retrieved context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    pub text: String,
    pub source: String,
}

impl RetrievedSnippet {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// Context lookup for a lemma. An empty result is a valid answer.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn query(&self, lemma: &str) -> Result<Vec<RetrievedSnippet>>;
}

/// Retriever with no index behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetriever;

#[async_trait]
impl Retriever for NoopRetriever {
    async fn query(&self, _lemma: &str) -> Result<Vec<RetrievedSnippet>> {
        Ok(Vec::new())
    }
}

/// In-memory corpus matched by whole words, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    documents: Vec<RetrievedSnippet>,
    max_results: usize,
}

impl StaticRetriever {
    #[must_use]
    pub fn new(documents: Vec<RetrievedSnippet>) -> Self {
        Self {
            documents,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Load a JSON array of `{ "text": ..., "source": ... }` objects.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        log::info!("Loading retrieval corpus from {:?}", path.as_ref());
        let data = tokio::fs::read_to_string(path.as_ref()).await?;
        let documents: Vec<RetrievedSnippet> = serde_json::from_str(&data)?;
        log::info!("Loaded {} corpus snippets", documents.len());
        Ok(Self::new(documents))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn word_key(text: &str) -> String {
    let words: Vec<String> = text.unicode_words().map(str::to_lowercase).collect();
    format!(" {} ", words.join(" "))
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn query(&self, lemma: &str) -> Result<Vec<RetrievedSnippet>> {
        let needle = word_key(lemma);
        if needle.trim().is_empty() {
            return Err(LlmError::Retrieval("empty lemma".to_string()));
        }
        let hits: Vec<RetrievedSnippet> = self
            .documents
            .iter()
            .filter(|doc| word_key(&doc.text).contains(&needle))
            .take(self.max_results)
            .cloned()
            .collect();
        log::debug!("Retrieved {} snippets for '{}'", hits.len(), lemma);
        Ok(hits)
    }
}
