use thiserror::Error;
use wordpack_llm::LlmError;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors raised inside the synthesis pipeline.
///
/// The orchestrator recovers from every variant locally; they surface to
/// callers only through the lower-level building blocks and the pack store.
#[derive(Error, Debug)]
pub enum SynthError {
    /// LLM reply could not be parsed even after sanitization
    #[error("Malformed LLM output: {0}")]
    MalformedLlmOutput(String),

    /// The completion call itself failed
    #[error("Upstream LLM failure: {0}")]
    Upstream(#[from] LlmError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl SynthError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedLlmOutput(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
