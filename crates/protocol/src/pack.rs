use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Qualitative confidence, ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Case-insensitive match against the three known levels.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register categories for example sentences.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ExampleCategory {
    Dev,
    #[serde(rename = "CS")]
    Cs,
    #[serde(rename = "LLM")]
    Llm,
    Business,
    Common,
}

impl ExampleCategory {
    pub const ALL: [Self; 5] = [Self::Dev, Self::Cs, Self::Llm, Self::Business, Self::Common];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "Dev",
            Self::Cs => "CS",
            Self::Llm => "LLM",
            Self::Business => "Business",
            Self::Common => "Common",
        }
    }
}

impl fmt::Display for ExampleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExampleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown example category '{s}' (expected Dev, CS, LLM, Business or Common)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sense {
    pub id: String,
    /// Gloss in the learner's language.
    pub gloss: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollocationSet {
    #[serde(default)]
    pub verb_object: Vec<String>,
    #[serde(default)]
    pub adj_noun: Vec<String>,
    #[serde(default)]
    pub prep_noun: Vec<String>,
}

impl CollocationSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verb_object.is_empty() && self.adj_noun.is_empty() && self.prep_noun.is_empty()
    }
}

/// Register tier (`general`, `academic`, ...) to collocation patterns.
pub type Collocations = BTreeMap<String, CollocationSet>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Example {
    pub en: String,
    pub ja: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Etymology {
    pub note: String,
    pub confidence: ConfidenceLevel,
}

/// Retrieval snippet offered as evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Citation {
    pub id: String,
    pub source: String,
    pub text: String,
}

/// Fields a synthesis call may overwrite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PackField {
    Senses,
    Collocations,
    Examples,
    Etymology,
    /// Citations together with the pack-level confidence derived from them.
    Citations,
}

impl PackField {
    pub const ALL: [Self; 5] = [
        Self::Senses,
        Self::Collocations,
        Self::Examples,
        Self::Etymology,
        Self::Citations,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegenerateScope {
    None,
    #[default]
    All,
    Fields(BTreeSet<PackField>),
}

impl RegenerateScope {
    #[must_use]
    pub fn covers(&self, field: PackField) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Fields(fields) => fields.contains(&field),
        }
    }

    #[must_use]
    pub fn covers_any(&self, fields: &[PackField]) -> bool {
        fields.iter().any(|field| self.covers(*field))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordPack {
    pub lemma: String,
    pub senses: Vec<Sense>,
    #[serde(default)]
    pub collocations: Collocations,
    pub examples: BTreeMap<ExampleCategory, Vec<Example>>,
    pub etymology: Etymology,
    pub citations: Vec<Citation>,
    pub confidence: ConfidenceLevel,
    #[serde(default)]
    pub regenerate_scope: RegenerateScope,
}

impl WordPack {
    #[must_use]
    pub fn example_count(&self) -> usize {
        self.examples.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn confidence_is_totally_ordered() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
        assert_eq!(
            ConfidenceLevel::ALL.iter().max(),
            Some(&ConfidenceLevel::High)
        );
    }

    #[test]
    fn confidence_parses_leniently() {
        assert_eq!(
            ConfidenceLevel::parse_lenient(" HIGH "),
            Some(ConfidenceLevel::High)
        );
        assert_eq!(
            ConfidenceLevel::parse_lenient("Medium"),
            Some(ConfidenceLevel::Medium)
        );
        assert_eq!(ConfidenceLevel::parse_lenient("certain"), None);
    }

    #[test]
    fn categories_use_exact_wire_names() {
        let names: Vec<String> = ExampleCategory::ALL
            .iter()
            .map(|c| serde_json::to_value(c).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Dev", "CS", "LLM", "Business", "Common"]);
        assert_eq!("llm".parse::<ExampleCategory>(), Ok(ExampleCategory::Llm));
        assert!("Legal".parse::<ExampleCategory>().is_err());
    }

    #[test]
    fn regenerate_scope_wire_format() {
        assert_eq!(serde_json::to_value(RegenerateScope::All).unwrap(), json!("all"));
        assert_eq!(serde_json::to_value(RegenerateScope::None).unwrap(), json!("none"));
        let scope: RegenerateScope =
            serde_json::from_value(json!({"fields": ["examples", "etymology"]})).unwrap();
        assert!(scope.covers(PackField::Examples));
        assert!(scope.covers(PackField::Etymology));
        assert!(!scope.covers(PackField::Senses));
    }

    #[test]
    fn word_pack_serializes_with_expected_field_names() {
        let mut examples = BTreeMap::new();
        examples.insert(
            ExampleCategory::Cs,
            vec![Example {
                en: "Line1\nLine2".to_string(),
                ja: "行1\n行2".to_string(),
            }],
        );
        let pack = WordPack {
            lemma: "converge".to_string(),
            senses: vec![],
            collocations: Collocations::new(),
            examples,
            etymology: Etymology {
                note: "from Latin".to_string(),
                confidence: ConfidenceLevel::Medium,
            },
            citations: vec![],
            confidence: ConfidenceLevel::Low,
            regenerate_scope: RegenerateScope::All,
        };
        let value = serde_json::to_value(&pack).unwrap();
        for key in ["lemma", "senses", "examples", "etymology", "citations", "confidence"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["examples"]["CS"][0]["en"], json!("Line1\nLine2"));
        assert_eq!(value["etymology"]["confidence"], json!("medium"));

        let back: WordPack = serde_json::from_value(value).unwrap();
        assert_eq!(back, pack);
    }
}
