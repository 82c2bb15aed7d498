//! # WordPack Protocol
//!
//! Wire types shared by the synthesis pipeline, the CLI and any persistence layer:
//! [`WordPack`] and its parts, the [`SynthesisRequest`] callers send, and the lemma
//! identity rule used to key stored packs.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod lemma;
mod pack;
mod request;

pub use lemma::normalize_lemma;
pub use pack::{
    Citation, CollocationSet, Collocations, ConfidenceLevel, Etymology, Example, ExampleCategory,
    PackField, RegenerateScope, Sense, WordPack,
};
pub use request::{ExamplePlan, SynthesisRequest};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// JSON Schema for the synthesis request and the pack it produces.
pub fn schema_document() -> Result<serde_json::Value> {
    let request = schemars::schema_for!(SynthesisRequest);
    let pack = schemars::schema_for!(WordPack);
    Ok(serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "request": serde_json::to_value(request)?,
        "word_pack": serde_json::to_value(pack)?,
    }))
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
