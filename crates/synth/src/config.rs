use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_ETYMOLOGY_PLACEHOLDER: &str =
    "語源情報は確かな根拠をもって特定できませんでした。";

/// Citation thresholds for the pack-level confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Supporting citations needed for `high`; anything between 1 and this is `medium`.
    pub high_min: usize,

    /// A citation counts as supporting only if its trimmed text has this many characters.
    pub min_snippet_chars: usize,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            high_min: 2,
            min_snippet_chars: 1,
        }
    }
}

/// Synthesis pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Budget for a single LLM completion
    pub llm_timeout_ms: u64,

    /// Budget for the retrieval query
    pub retrieval_timeout_ms: u64,

    /// Citations kept from retrieval
    pub max_citations: usize,

    /// Characters of each snippet quoted in the draft prompt
    pub context_snippet_chars: usize,

    /// Upper bound applied to every example-plan count
    pub max_examples_per_category: usize,

    /// Run example categories concurrently
    pub parallel_examples: bool,

    /// Etymology note used when the model gives none
    pub etymology_placeholder: String,

    pub confidence: ConfidencePolicy,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 60_000,
            retrieval_timeout_ms: 5_000,
            max_citations: 5,
            context_snippet_chars: 400,
            max_examples_per_category: 10,
            parallel_examples: false,
            etymology_placeholder: DEFAULT_ETYMOLOGY_PLACEHOLDER.to_string(),
            confidence: ConfidencePolicy::default(),
        }
    }
}

impl SynthConfig {
    /// Config for tests and offline runs: short timeouts, sequential examples.
    pub fn for_offline() -> Self {
        Self {
            llm_timeout_ms: 2_000,
            retrieval_timeout_ms: 1_000,
            ..Default::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        log::info!("Loading synthesis config from {:?}", path.as_ref());
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&raw)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_millis(self.retrieval_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.llm_timeout_ms == 0 {
            return Err(SynthError::invalid_config("llm_timeout_ms must be > 0"));
        }
        if self.retrieval_timeout_ms == 0 {
            return Err(SynthError::invalid_config("retrieval_timeout_ms must be > 0"));
        }
        if self.max_examples_per_category == 0 {
            return Err(SynthError::invalid_config(
                "max_examples_per_category must be > 0",
            ));
        }
        if self.confidence.high_min == 0 {
            return Err(SynthError::invalid_config("confidence.high_min must be >= 1"));
        }
        if self.etymology_placeholder.trim().is_empty() {
            return Err(SynthError::invalid_config(
                "etymology_placeholder must not be empty",
            ));
        }
        Ok(())
    }
}
