use crate::pack::{ExampleCategory, RegenerateScope, WordPack};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requested number of examples per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ExamplePlan(BTreeMap<ExampleCategory, usize>);

impl ExamplePlan {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, category: ExampleCategory, count: usize) -> Self {
        self.0.insert(category, count);
        self
    }

    pub fn set(&mut self, category: ExampleCategory, count: usize) {
        self.0.insert(category, count);
    }

    #[must_use]
    pub fn count(&self, category: ExampleCategory) -> Option<usize> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExampleCategory, usize)> + '_ {
        self.0.iter().map(|(category, count)| (*category, *count))
    }

    #[must_use]
    pub fn categories(&self) -> Vec<ExampleCategory> {
        self.0.keys().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clamp every count to `max`.
    #[must_use]
    pub fn clamped(&self, max: usize) -> Self {
        Self(
            self.0
                .iter()
                .map(|(category, count)| (*category, (*count).min(max)))
                .collect(),
        )
    }
}

impl Default for ExamplePlan {
    fn default() -> Self {
        Self::new()
            .with(ExampleCategory::Dev, 5)
            .with(ExampleCategory::Cs, 5)
            .with(ExampleCategory::Llm, 5)
            .with(ExampleCategory::Business, 3)
            .with(ExampleCategory::Common, 6)
    }
}

impl FromIterator<(ExampleCategory, usize)> for ExamplePlan {
    fn from_iter<I: IntoIterator<Item = (ExampleCategory, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Caller-facing synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisRequest {
    pub lemma: String,
    #[serde(default)]
    pub example_plan: ExamplePlan,
    #[serde(default)]
    pub regenerate_scope: RegenerateScope,
    /// Previously synthesized pack; fields outside `regenerate_scope` are copied from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<WordPack>,
}

impl SynthesisRequest {
    pub fn new(lemma: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            example_plan: ExamplePlan::default(),
            regenerate_scope: RegenerateScope::All,
            previous: None,
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: ExamplePlan) -> Self {
        self.example_plan = plan;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: RegenerateScope, previous: Option<WordPack>) -> Self {
        self.regenerate_scope = scope;
        self.previous = previous;
        self
    }
}
