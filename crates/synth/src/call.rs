use crate::error::Result;
use std::time::Duration;
use wordpack_llm::{LlmClient, LlmError};

/// One completion bounded by `timeout`.
pub(crate) async fn complete_with_timeout(
    llm: &dyn LlmClient,
    prompt: &str,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, llm.complete(prompt)).await {
        Ok(reply) => Ok(reply?),
        Err(_) => Err(LlmError::Timeout(timeout.as_millis() as u64).into()),
    }
}
