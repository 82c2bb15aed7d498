//! # WordPack LLM
//!
//! The two outbound collaborators of the synthesis pipeline, each behind a
//! one-method trait so the orchestrator never branches on the backend:
//!
//! - [`LlmClient::complete`]: prompt in, completion text out
//!   ([`OpenAiCompatibleClient`], [`OfflineLlm`], [`ScriptedLlm`])
//! - [`Retriever::query`]: lemma in, context snippets out
//!   ([`StaticRetriever`], [`NoopRetriever`])
//!
//! [`SharedResource`] holds process-wide heavy objects (the HTTP client here)
//! with single-flight lazy construction.

mod client;
mod error;
mod openai;
mod retrieval;
mod shared;

pub use client::{LlmClient, OfflineLlm, ScriptedLlm};
pub use error::{LlmError, Result};
pub use openai::{build_client, LlmMode, LlmSettings, OpenAiCompatibleClient};
pub use retrieval::{NoopRetriever, RetrievedSnippet, Retriever, StaticRetriever};
pub use shared::SharedResource;
