use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("LLM backend returned an empty completion")]
    EmptyResponse,

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("LLM backend unavailable: {0}")]
    Unavailable(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Invalid LLM configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Request(format!("timeout: {err}"));
        }
        Self::Request(err.to_string())
    }
}
