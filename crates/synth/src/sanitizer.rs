//! Recovery of JSON documents from raw LLM replies.
//!
//! Models often emit literal newlines or other control characters inside JSON
//! string values, wrap the object in a Markdown fence, or surround it with a
//! sentence of prose. Standard parsing is tried first; the repairs below are
//! applied only when it fails.

use crate::error::{Result, SynthError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```").expect("valid fence regex")
});

/// Parse an LLM reply that is meant to be a single JSON document.
pub fn parse(raw: &str) -> Result<Value> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(SynthError::malformed("empty reply"));
    }

    let first_err = match parse_with_escaping(body) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if let Some(span) = outer_object_span(body) {
        if span.len() < body.len() {
            if let Ok(value) = parse_with_escaping(span) {
                log::debug!("Recovered JSON object from surrounding text");
                return Ok(value);
            }
        }
    }

    Err(SynthError::malformed(first_err.to_string()))
}

/// Like [`parse`], but the document must be a JSON object.
pub fn parse_object(raw: &str) -> Result<Value> {
    let value = parse(raw)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(SynthError::malformed(format!(
            "expected a JSON object, got {}",
            kind_name(&value)
        )))
    }
}

fn parse_with_escaping(text: &str) -> std::result::Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match escape_control_chars_in_strings(text) {
            Cow::Borrowed(_) => Err(err),
            Cow::Owned(escaped) => serde_json::from_str(&escaped),
        },
    }
}

/// Escape control characters (below U+0020) that sit inside string literals.
///
/// String boundaries are tracked with a quote/backslash state machine, so
/// structural whitespace between tokens is left as is. Returns the input
/// unchanged (borrowed) when nothing needed escaping.
pub fn escape_control_chars_in_strings(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut changed = false;

    for c in text.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }

        if escaped {
            escaped = false;
            if is_control(c) {
                // Backslash already emitted; complete it as a valid escape.
                out.push_str(&escape_body(c));
                changed = true;
            } else {
                out.push(c);
            }
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            c if is_control(c) => {
                out.push('\\');
                out.push_str(&escape_body(c));
                changed = true;
            }
            c => out.push(c),
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

fn is_control(c: char) -> bool {
    (c as u32) < 0x20
}

fn escape_body(c: char) -> String {
    match c {
        '\n' => "n".to_string(),
        '\r' => "r".to_string(),
        '\t' => "t".to_string(),
        '\u{08}' => "b".to_string(),
        '\u{0C}' => "f".to_string(),
        other => format!("u{:04x}", other as u32),
    }
}

/// Body of the first Markdown code fence, or `text` itself when there is none.
fn strip_code_fence(text: &str) -> &str {
    if text.starts_with('{') || text.starts_with('[') {
        return text;
    }
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |body| body.as_str().trim())
}

fn outer_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
