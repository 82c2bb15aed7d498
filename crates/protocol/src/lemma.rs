/// Canonical identity for a lemma: trimmed, inner whitespace collapsed, lowercased.
///
/// Storage and lookup layers key packs by this value so that `"NormalizeMe"`,
/// `"normalizeme"` and `"  NORMALIZEME  "` address the same entry.
#[must_use]
pub fn normalize_lemma(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_lemma("NormalizeMe"), "normalizeme");
        assert_eq!(normalize_lemma("normalizeme"), "normalizeme");
        assert_eq!(normalize_lemma("  NORMALIZEME  "), "normalizeme");
    }

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(normalize_lemma(" Supply \t  Chain\n"), "supply chain");
        assert_eq!(normalize_lemma("   "), "");
    }
}
