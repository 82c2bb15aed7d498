use crate::error::{LlmError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Text-completion capability. One prompt in, one completion out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Short backend label for logs.
    fn name(&self) -> &str {
        "llm"
    }
}

/// Backend that never answers. Every synthesis step takes its fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLlm;

#[async_trait]
impl LlmClient for OfflineLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(LlmError::Unavailable("offline mode".to_string()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// Deterministic backend for tests and demos.
///
/// Replies are chosen by the first rule whose needle occurs in the prompt.
/// Prompts matching no rule get the fallback reply, or fail if none is set.
#[derive(Debug, Default)]
pub struct ScriptedLlm {
    rules: Vec<(String, ScriptedReply)>,
    fallback: Option<ScriptedReply>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules
            .push((needle.into(), ScriptedReply::Text(reply.into())));
        self
    }

    #[must_use]
    pub fn fail_on(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        let reason = format!("scripted failure for '{needle}'");
        self.rules.push((needle, ScriptedReply::Fail(reason)));
        self
    }

    #[must_use]
    pub fn otherwise(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(ScriptedReply::Text(reply.into()));
        self
    }

    /// Sleep before answering, to exercise caller timeouts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reply_for(&self, prompt: &str) -> Option<&ScriptedReply> {
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply)
            .or(self.fallback.as_ref())
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(prompt) {
            Some(ScriptedReply::Text(text)) => Ok(text.clone()),
            Some(ScriptedReply::Fail(reason)) => Err(LlmError::Request(reason.clone())),
            None => Err(LlmError::Unavailable("no scripted reply".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_always_fails() {
        let err = OfflineLlm.complete("anything").await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable(_)));
    }

    #[tokio::test]
    async fn scripted_matches_first_rule() {
        let llm = ScriptedLlm::new()
            .on("register: Dev", "dev reply")
            .on("register", "generic reply")
            .fail_on("explode")
            .otherwise("fallback");

        assert_eq!(llm.complete("... register: Dev ...").await.unwrap(), "dev reply");
        assert_eq!(llm.complete("register: CS").await.unwrap(), "generic reply");
        assert!(llm.complete("please explode").await.is_err());
        assert_eq!(llm.complete("unrelated").await.unwrap(), "fallback");
        assert_eq!(llm.calls(), 4);
        assert_eq!(llm.prompts()[1], "register: CS");
    }

    #[tokio::test]
    async fn scripted_without_fallback_fails_unmatched() {
        let llm = ScriptedLlm::new().on("a", "b");
        assert!(llm.complete("zzz").await.is_err());
    }
}
