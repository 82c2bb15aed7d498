//! Fixed word lists backing the lexical filter.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Closed-class words, elementary vocabulary, interjections and stock phrases.
const BASIC_WORDS: &[&str] = &[
    // articles & determiners
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
    "all", "both", "either", "neither", "no", "other", "another", "such", "own", "same",
    // pronouns
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
    "my", "your", "his", "its", "our", "their", "mine", "yours", "ours", "theirs",
    "myself", "yourself", "himself", "herself", "itself", "ourselves", "themselves",
    "someone", "something", "anyone", "anything", "everyone", "everything", "nobody",
    "nothing", "somebody", "anybody", "everybody",
    // be / have / do and modals
    "be", "am", "is", "are", "was", "were", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "done", "doing",
    "will", "would", "shall", "should", "may", "might", "can", "could", "must",
    // prepositions
    "to", "of", "in", "on", "at", "by", "for", "with", "from", "into", "onto", "about",
    "above", "below", "over", "under", "between", "through", "after", "before", "during",
    "without", "within", "across", "along", "around", "behind", "near", "off", "out", "up",
    "down", "upon", "toward", "towards", "against", "since", "until", "till",
    // conjunctions
    "and", "or", "but", "nor", "so", "yet", "if", "then", "than", "because", "while",
    "although", "though", "unless", "whether", "as", "when", "where", "how", "why",
    "what", "which", "who", "whom", "whose",
    // adverbs
    "not", "very", "too", "also", "just", "only", "even", "still", "already", "again",
    "here", "there", "now", "today", "tomorrow", "yesterday", "always", "never", "often",
    "sometimes", "usually", "soon", "later", "maybe", "perhaps", "really", "quite",
    "more", "most", "less", "least", "much", "many", "few", "little", "lot", "lots",
    // numbers
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "first", "second", "third", "last", "next",
    // elementary verbs
    "go", "goes", "went", "gone", "come", "came", "get", "got", "make", "made", "take",
    "took", "taken", "give", "gave", "given", "say", "said", "says", "see", "saw", "seen",
    "know", "knew", "known", "think", "thought", "want", "like", "look", "use", "used",
    "find", "found", "tell", "told", "ask", "work", "feel", "try", "leave", "call",
    "put", "keep", "let", "begin", "help", "show", "hear", "play", "run", "move", "live",
    "eat", "drink", "sleep", "walk", "talk", "read", "write", "sit", "stand", "open",
    "close", "buy", "pay", "need", "love", "stop", "wait",
    // elementary nouns
    "man", "woman", "child", "children", "people", "person", "boy", "girl", "friend",
    "family", "mother", "father", "day", "night", "week", "month", "year", "time",
    "thing", "things", "way", "home", "house", "school", "car", "book", "door", "room",
    "water", "food", "money", "name", "hand", "eye", "head", "dog", "cat", "city",
    "world", "life", "job", "place", "morning", "evening",
    // elementary adjectives
    "good", "bad", "big", "small", "new", "old", "great", "long", "short", "high", "low",
    "hot", "cold", "happy", "sad", "nice", "easy", "hard", "right", "wrong", "fine",
    "best", "better", "worse", "fast", "slow",
    // interjections and stock phrases
    "hello", "hi", "hey", "bye", "goodbye", "thanks", "thank", "thank you", "please",
    "sorry", "yes", "yeah", "ok", "okay", "oh", "wow", "well", "welcome", "excuse me",
    "good morning", "good night", "of course", "you know", "i mean", "a lot", "kind of",
    "sort of", "at all",
];

/// Terms recognized as technical, business or academic vocabulary.
const DOMAIN_TERMS: &[&str] = &[
    // engineering
    "api", "latency", "throughput", "algorithm", "protocol", "compiler", "runtime",
    "kernel", "cache", "database", "query", "schema", "deploy", "deployment", "endpoint",
    "refactor", "concurrency", "thread", "mutex", "backend", "frontend", "pipeline",
    "repository", "dependency", "regression", "scalability", "idempotent",
    // machine learning
    "inference", "embedding", "token", "tokenizer", "prompt", "dataset", "gradient",
    "fine-tuning", "hallucination", "transformer", "retrieval", "benchmark",
    // business
    "revenue", "margin", "equity", "stakeholder", "leverage", "logistics", "procurement",
    "compliance", "audit", "inventory", "forecast", "acquisition", "liability", "asset",
    "supply", "valuation", "dividend", "portfolio", "merger",
    // academic
    "hypothesis", "empirical", "paradigm", "framework", "methodology", "mitigate",
    "analysis", "synthesis", "criterion", "phenomenon", "theorem", "corpus",
];

/// Academic/technical derivational suffixes. Only applied to tokens of at least
/// [`MIN_SUFFIX_TOKEN_LEN`] characters.
const ACADEMIC_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ity", "ism", "ist", "ology", "ics", "ical", "ize", "ise",
    "ify", "ate", "ive", "ous", "ence", "ance", "sis", "gic", "tic",
];

const MIN_SUFFIX_TOKEN_LEN: usize = 6;

static BASIC_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| BASIC_WORDS.iter().copied().collect());
static DOMAIN_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DOMAIN_TERMS.iter().copied().collect());

/// `term` must already be normalized (lowercase, single spaces).
#[must_use]
pub fn is_basic_word(term: &str) -> bool {
    BASIC_SET.contains(term)
}

#[must_use]
pub fn is_domain_term(token: &str) -> bool {
    DOMAIN_SET.contains(token)
}

#[must_use]
pub fn has_academic_suffix(token: &str) -> bool {
    token.chars().count() >= MIN_SUFFIX_TOKEN_LEN
        && ACADEMIC_SUFFIXES.iter().any(|suffix| token.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_set_covers_closed_class_and_interjections() {
        for word in ["the", "of", "and", "hello", "thanks", "thank you", "good"] {
            assert!(is_basic_word(word), "{word} should be basic");
        }
    }

    #[test]
    fn basic_and_domain_lists_do_not_overlap() {
        for term in DOMAIN_TERMS {
            assert!(!is_basic_word(term), "{term} is in both lists");
        }
    }

    #[test]
    fn suffix_rule_needs_long_tokens() {
        assert!(has_academic_suffix("strategic"));
        assert!(has_academic_suffix("regulation"));
        assert!(!has_academic_suffix("late"));
        assert!(!has_academic_suffix("ate"));
    }
}
