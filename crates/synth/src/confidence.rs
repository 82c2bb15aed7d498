use crate::config::ConfidencePolicy;
use wordpack_protocol::{Citation, ConfidenceLevel};

/// Maps supporting citations to a confidence level.
///
/// Levels only depend on the number of citations that pass the quality bar,
/// and that number can only grow when citations are added, so the score is
/// monotone in the citation set.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceScorer {
    policy: ConfidencePolicy,
}

impl ConfidenceScorer {
    pub fn new(policy: ConfidencePolicy) -> Self {
        Self { policy }
    }

    pub fn score(&self, citations: &[Citation]) -> ConfidenceLevel {
        let supporting = citations
            .iter()
            .filter(|citation| self.is_supporting(citation))
            .count();
        match supporting {
            0 => ConfidenceLevel::Low,
            n if n < self.policy.high_min => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::High,
        }
    }

    fn is_supporting(&self, citation: &Citation) -> bool {
        citation.text.trim().chars().count() >= self.policy.min_snippet_chars.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(text: &str) -> Citation {
        Citation {
            id: format!("id-{text}"),
            source: "test".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn thresholds_follow_policy() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(&[]), ConfidenceLevel::Low);
        assert_eq!(scorer.score(&[citation("one")]), ConfidenceLevel::Medium);
        assert_eq!(
            scorer.score(&[citation("one"), citation("two")]),
            ConfidenceLevel::High
        );
    }

    #[test]
    fn blank_or_short_snippets_do_not_count() {
        let scorer = ConfidenceScorer::new(ConfidencePolicy {
            high_min: 2,
            min_snippet_chars: 10,
        });
        assert_eq!(scorer.score(&[citation("   ")]), ConfidenceLevel::Low);
        assert_eq!(
            scorer.score(&[citation("short"), citation("long enough snippet")]),
            ConfidenceLevel::Medium
        );
        assert_eq!(ConfidenceScorer::default().score(&[citation(" ")]), ConfidenceLevel::Low);
    }

    #[test]
    fn more_citations_never_lower_confidence() {
        let texts = ["", "a", "   ", "longer evidence", "x", "another one", "", "z"];
        for high_min in 1..=4 {
            for min_snippet_chars in 0..=3 {
                let scorer = ConfidenceScorer::new(ConfidencePolicy {
                    high_min,
                    min_snippet_chars,
                });
                let all: Vec<Citation> = texts.iter().map(|t| citation(t)).collect();
                for end in 0..all.len() {
                    let subset = scorer.score(&all[..end]);
                    let superset = scorer.score(&all[..=end]);
                    assert!(
                        superset >= subset,
                        "high_min={high_min} min_chars={min_snippet_chars} end={end}"
                    );
                }
            }
        }
    }
}
