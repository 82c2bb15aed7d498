use sha2::{Digest, Sha256};
use wordpack_llm::RetrievedSnippet;
use wordpack_protocol::Citation;

const CITATION_ID_HEX_CHARS: usize = 12;

/// Stable citation id: leading hex of SHA-256 over source and text.
pub fn citation_id(source: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
        .chars()
        .take(CITATION_ID_HEX_CHARS)
        .collect()
}

pub fn citation_from_snippet(snippet: &RetrievedSnippet) -> Citation {
    let text = snippet.text.trim().to_string();
    Citation {
        id: citation_id(&snippet.source, &text),
        source: snippet.source.clone(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_content_addressed() {
        let a = citation_id("wiki", "text");
        assert_eq!(a.len(), CITATION_ID_HEX_CHARS);
        assert_eq!(a, citation_id("wiki", "text"));
        assert_ne!(a, citation_id("wiki", "other"));
        assert_ne!(citation_id("ab", "c"), citation_id("a", "bc"));
    }

    #[test]
    fn snippet_text_is_trimmed() {
        let citation = citation_from_snippet(&RetrievedSnippet::new("  body \n", "src"));
        assert_eq!(citation.text, "body");
        assert_eq!(citation.source, "src");
    }
}
