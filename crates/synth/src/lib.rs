//! # WordPack Synth
//!
//! Turns a lemma into a finished [`WordPack`](wordpack_protocol::WordPack).
//!
//! ## Pipeline
//!
//! ```text
//! SynthesisRequest
//!     │
//!     ├──> Retriever::query ──> citations (empty on failure)
//!     │
//!     ├──> draft prompt ──> LlmClient::complete ──> sanitizer::parse_object
//!     │                                              └─> DraftPayload (all fields optional)
//!     │
//!     ├──> ExampleGenerator (one call per planned category)
//!     │
//!     ├──> FallbackSynthesizer (etymology note / confidence defaults)
//!     │
//!     ├──> ConfidenceScorer (citations ──> low / medium / high)
//!     │
//!     └──> scope merge with the previous pack ──> WordPack
//! ```
//!
//! Every failure along the way has a deterministic degraded result; the
//! orchestrator never returns an error.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordpack_llm::{NoopRetriever, OfflineLlm};
//! use wordpack_protocol::SynthesisRequest;
//! use wordpack_synth::{SynthConfig, WordPackSynthesizer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let synth = WordPackSynthesizer::new(
//!         Arc::new(OfflineLlm),
//!         Arc::new(NoopRetriever),
//!         SynthConfig::default(),
//!     )?;
//!     let outcome = synth.synthesize(SynthesisRequest::new("mitigate")).await;
//!     println!("{}", serde_json::to_string_pretty(&outcome.pack)?);
//!     Ok(())
//! }
//! ```

mod call;
mod citations;
mod confidence;
mod config;
mod error;
mod examples;
mod fallback;
mod orchestrator;
mod payload;
mod prompts;
pub mod sanitizer;
mod store;

pub use citations::{citation_from_snippet, citation_id};
pub use confidence::ConfidenceScorer;
pub use config::{ConfidencePolicy, SynthConfig};
pub use error::{Result, SynthError};
pub use examples::ExampleGenerator;
pub use fallback::{CompletedFields, FallbackSynthesizer};
pub use orchestrator::{
    CategoryReport, StepStatus, SynthesisOutcome, SynthesisReport, WordPackSynthesizer,
};
pub use payload::{DraftPayload, EtymologyPayload, SensePayload};
pub use prompts::{build_draft_prompt, build_example_prompt, register_description};
pub use store::WordPackStore;
