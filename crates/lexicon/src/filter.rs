use crate::vocabulary::{has_academic_suffix, is_basic_word, is_domain_term};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;
use wordpack_protocol::normalize_lemma;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermClass {
    /// Empty, punctuation-only, numeric, or a single letter
    Noise,
    /// Closed-class or elementary vocabulary
    Basic,
    /// Contains a technical/academic token
    Domain,
    /// Multi-word term that is not itself a stock phrase
    Compound,
    /// Any other single word outside the basic set
    General,
}

impl TermClass {
    #[must_use]
    pub const fn is_kept(self) -> bool {
        matches!(self, Self::Domain | Self::Compound | Self::General)
    }
}

/// Article-import vocabulary filter.
#[derive(Debug, Clone, Default)]
pub struct LexicalFilter {
    extra_basic: HashSet<String>,
}

impl LexicalFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the built-in basic set, e.g. with words a learner already knows.
    #[must_use]
    pub fn with_basic_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_basic.extend(
            words
                .into_iter()
                .map(|w| normalize_term(w.as_ref()))
                .filter(|w| !w.is_empty()),
        );
        self
    }

    #[must_use]
    pub fn classify(&self, candidate: &str) -> TermClass {
        let term = normalize_term(candidate);
        if term.is_empty() || !term.chars().any(char::is_alphabetic) {
            return TermClass::Noise;
        }
        if term.chars().filter(|c| c.is_alphabetic()).count() == 1 && !term.contains(' ') {
            return TermClass::Noise;
        }
        if self.is_basic(&term) {
            return TermClass::Basic;
        }

        let tokens: Vec<&str> = term.unicode_words().collect();
        if tokens
            .iter()
            .any(|token| is_domain_term(token) || has_academic_suffix(token))
        {
            return TermClass::Domain;
        }
        if tokens.len() > 1 {
            return TermClass::Compound;
        }
        TermClass::General
    }

    /// Keep the candidates worth learning. Order is preserved; nothing is added.
    pub fn filter<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
        let kept: Vec<String> = candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|candidate| self.classify(candidate).is_kept())
            .map(str::to_string)
            .collect();
        log::debug!(
            "Lexical filter kept {} of {} candidates",
            kept.len(),
            candidates.len()
        );
        kept
    }

    fn is_basic(&self, term: &str) -> bool {
        is_basic_word(term) || self.extra_basic.contains(term)
    }
}

fn normalize_term(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    normalize_lemma(trimmed)
}
