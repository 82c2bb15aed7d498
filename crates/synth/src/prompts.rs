//! Prompt builders for the draft call and the per-category example calls.

use std::fmt::Write as _;
use wordpack_protocol::{Citation, ExampleCategory};

const EXAMPLE_FRAMING: &str = "You are a lexicographer writing natural, learner-friendly \
example sentences for Japanese learners of English.";

const EXAMPLE_SCHEMA: &str = "Return only a JSON object of the form \
{\"examples\": [{\"en\": \"...\", \"ja\": \"...\"}]} with no commentary. \
\"en\" is an English sentence that uses the target word; \"ja\" is its natural Japanese translation.";

const DRAFT_FRAMING: &str = "You are a lexicographer compiling a vocabulary study pack \
for Japanese learners of English.";

const DRAFT_SCHEMA: &str = r#"Return only a JSON object with this shape and no commentary:
{
  "senses": [{"id": "s1", "gloss": "<concise Japanese gloss>", "patterns": ["<typical usage pattern>"]}],
  "collocations": {
    "general": {"verb_object": [], "adj_noun": [], "prep_noun": []},
    "academic": {"verb_object": [], "adj_noun": [], "prep_noun": []}
  },
  "etymology": {"note": "<short etymology in Japanese>", "confidence": "low|medium|high"}
}
Use the context snippets as evidence where they are relevant. If the etymology is uncertain, say so in the note and use "low"."#;

/// Register description injected into the example prompt for `category`.
pub const fn register_description(category: ExampleCategory) -> &'static str {
    match category {
        ExampleCategory::Dev => {
            "software development in practice: code review, debugging, deployment, \
             version control and day-to-day engineering teamwork"
        }
        ExampleCategory::Cs => {
            "computer science theory and education: algorithms, data structures, \
             complexity analysis and formal textbook explanations"
        }
        ExampleCategory::Llm => {
            "large language models and applied AI: prompting, fine-tuning, inference, \
             evaluation and model behavior"
        }
        ExampleCategory::Business => {
            "business and management communication: meetings, strategy, finance, \
             negotiation and formal email"
        }
        ExampleCategory::Common => {
            "everyday conversation and general-interest writing: daily life, news, \
             travel and casual talk among friends"
        }
    }
}

/// Prompt for one category; carries only that category's register description.
pub fn build_example_prompt(lemma: &str, category: ExampleCategory, count: usize) -> String {
    format!(
        "{EXAMPLE_FRAMING}\n\
         Target word: \"{lemma}\"\n\
         Register ({category}): {description}.\n\
         {EXAMPLE_SCHEMA}\n\
         Return exactly {count} items in the \"examples\" array.",
        description = register_description(category),
    )
}

/// Main synthesis prompt: lemma, numbered context snippets, schema.
pub fn build_draft_prompt(lemma: &str, citations: &[Citation], snippet_chars: usize) -> String {
    let mut prompt = format!("{DRAFT_FRAMING}\nTarget word: \"{lemma}\"\nContext snippets:\n");
    if citations.is_empty() {
        prompt.push_str("(none)\n");
    }
    for (idx, citation) in citations.iter().enumerate() {
        let excerpt: String = citation.text.chars().take(snippet_chars).collect();
        let _ = writeln!(prompt, "[{}] ({}) {}", idx + 1, citation.source, excerpt);
    }
    prompt.push_str(DRAFT_SCHEMA);
    prompt
}
