use crate::call::complete_with_timeout;
use crate::citations::citation_from_snippet;
use crate::confidence::ConfidenceScorer;
use crate::config::SynthConfig;
use crate::error::{Result, SynthError};
use crate::examples::ExampleGenerator;
use crate::fallback::FallbackSynthesizer;
use crate::payload::DraftPayload;
use crate::prompts::build_draft_prompt;
use crate::sanitizer;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use wordpack_llm::{LlmClient, Retriever};
use wordpack_protocol::{
    normalize_lemma, Citation, Example, ExampleCategory, ExamplePlan, PackField, RegenerateScope,
    SynthesisRequest, WordPack,
};

const DRAFT_FIELDS: [PackField; 3] = [PackField::Senses, PackField::Collocations, PackField::Etymology];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum StepStatus {
    Ok,
    Skipped,
    Degraded(String),
}

impl StepStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: ExampleCategory,
    pub requested: usize,
    pub produced: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryReport {
    pub fn is_shortfall(&self) -> bool {
        self.produced < self.requested
    }
}

/// What happened during one synthesis call. Nothing here is an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub retrieval: StepStatus,
    pub draft: StepStatus,
    pub categories: Vec<CategoryReport>,
    pub reused_previous: bool,
}

impl SynthesisReport {
    fn skipped() -> Self {
        Self {
            retrieval: StepStatus::Skipped,
            draft: StepStatus::Skipped,
            categories: Vec::new(),
            reused_previous: false,
        }
    }

    pub fn shortfalls(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories.iter().filter(|c| c.is_shortfall())
    }

    pub fn is_degraded(&self) -> bool {
        self.retrieval.is_degraded()
            || self.draft.is_degraded()
            || self.categories.iter().any(|c| c.error.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub pack: WordPack,
    pub report: SynthesisReport,
}

/// Composes retrieval, the draft call, example expansion, fallbacks and scoring
/// into one best-effort synthesis. Always returns a pack.
pub struct WordPackSynthesizer {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    config: SynthConfig,
    examples: ExampleGenerator,
    fallback: FallbackSynthesizer,
    scorer: ConfidenceScorer,
}

impl WordPackSynthesizer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        config: SynthConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            examples: ExampleGenerator::new(llm.clone(), config.llm_timeout()),
            fallback: FallbackSynthesizer::new(config.etymology_placeholder.clone()),
            scorer: ConfidenceScorer::new(config.confidence.clone()),
            llm,
            retriever,
            config,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub async fn synthesize(&self, request: SynthesisRequest) -> SynthesisOutcome {
        let lemma = normalize_lemma(&request.lemma);
        if lemma.is_empty() {
            log::warn!("Synthesis requested for an empty lemma; output will be defaults only");
        }
        let plan = request
            .example_plan
            .clamped(self.config.max_examples_per_category);

        let (scope, previous) = match (request.regenerate_scope, request.previous) {
            (RegenerateScope::All, _) => (RegenerateScope::All, None),
            (scope, Some(previous)) => (scope, Some(previous)),
            (scope, None) => {
                log::info!("Scope {scope:?} for '{lemma}' has no previous pack; regenerating all");
                (RegenerateScope::All, None)
            }
        };

        if let (RegenerateScope::None, Some(previous)) = (&scope, &previous) {
            log::info!("Scope none for '{lemma}': returning previous pack unchanged");
            let mut pack = previous.clone();
            pack.lemma = lemma;
            pack.regenerate_scope = RegenerateScope::None;
            self.finish(&mut pack, &plan);
            let mut report = SynthesisReport::skipped();
            report.reused_previous = true;
            return SynthesisOutcome { pack, report };
        }

        log::info!("Synthesizing word pack for '{lemma}' (scope {scope:?})");
        let mut report = SynthesisReport::skipped();
        report.reused_previous = previous.is_some();

        let needs_draft = scope.covers_any(&DRAFT_FIELDS);
        let needs_retrieval = needs_draft || scope.covers(PackField::Citations);

        let citations = if needs_retrieval {
            let (citations, status) = self.retrieve(&lemma).await;
            report.retrieval = status;
            citations
        } else {
            Vec::new()
        };

        let draft = if needs_draft {
            let (draft, status) = self.draft(&lemma, &citations).await;
            report.draft = status;
            draft
        } else {
            DraftPayload::default()
        };

        let examples = if scope.covers(PackField::Examples) {
            let (examples, categories) = self.expand_examples(&lemma, &plan).await;
            report.categories = categories;
            examples
        } else {
            BTreeMap::new()
        };

        let fields = self.fallback.fill(draft);
        let confidence = self.scorer.score(&citations);

        let fresh = WordPack {
            lemma,
            senses: fields.senses,
            collocations: fields.collocations,
            examples,
            etymology: fields.etymology,
            citations,
            confidence,
            regenerate_scope: scope.clone(),
        };

        let mut pack = match previous {
            Some(previous) => merge_scoped(previous, fresh, &scope),
            None => fresh,
        };
        self.finish(&mut pack, &plan);

        for shortfall in report.shortfalls() {
            log::warn!(
                "Example shortfall for '{}' ({}): {} of {}",
                pack.lemma,
                shortfall.category,
                shortfall.produced,
                shortfall.requested
            );
        }
        log::info!(
            "Word pack for '{}' ready: {} senses, {} examples, {} citations, confidence {}",
            pack.lemma,
            pack.senses.len(),
            pack.example_count(),
            pack.citations.len(),
            pack.confidence
        );
        SynthesisOutcome { pack, report }
    }

    async fn retrieve(&self, lemma: &str) -> (Vec<Citation>, StepStatus) {
        let timeout = self.config.retrieval_timeout();
        match tokio::time::timeout(timeout, self.retriever.query(lemma)).await {
            Ok(Ok(snippets)) => {
                let citations: Vec<Citation> = snippets
                    .iter()
                    .filter(|snippet| !snippet.text.trim().is_empty())
                    .take(self.config.max_citations)
                    .map(citation_from_snippet)
                    .collect();
                log::debug!("Retrieved {} citations for '{lemma}'", citations.len());
                (citations, StepStatus::Ok)
            }
            Ok(Err(err)) => {
                log::warn!("Retrieval for '{lemma}' failed, continuing without context: {err}");
                (Vec::new(), StepStatus::Degraded(err.to_string()))
            }
            Err(_) => {
                let reason = format!("retrieval timed out after {} ms", timeout.as_millis());
                log::warn!("Retrieval for '{lemma}': {reason}");
                (Vec::new(), StepStatus::Degraded(reason))
            }
        }
    }

    async fn draft(&self, lemma: &str, citations: &[Citation]) -> (DraftPayload, StepStatus) {
        let prompt = build_draft_prompt(lemma, citations, self.config.context_snippet_chars);
        match self.request_draft(&prompt).await {
            Ok(draft) => (draft, StepStatus::Ok),
            Err(err) => {
                log::warn!("Draft for '{lemma}' unusable, using fallback defaults: {err}");
                (DraftPayload::default(), StepStatus::Degraded(err.to_string()))
            }
        }
    }

    async fn request_draft(&self, prompt: &str) -> Result<DraftPayload> {
        let reply =
            complete_with_timeout(self.llm.as_ref(), prompt, self.config.llm_timeout()).await?;
        let document = sanitizer::parse_object(&reply)?;
        Ok(DraftPayload::from_value(&document))
    }

    async fn expand_examples(
        &self,
        lemma: &str,
        plan: &ExamplePlan,
    ) -> (BTreeMap<ExampleCategory, Vec<Example>>, Vec<CategoryReport>) {
        let mut results: BTreeMap<ExampleCategory, Result<Vec<Example>>> = BTreeMap::new();

        if self.config.parallel_examples && plan.len() > 1 {
            let mut tasks = JoinSet::new();
            for (category, count) in plan.iter() {
                let generator = self.examples.clone();
                let lemma = lemma.to_string();
                tasks.spawn(async move {
                    let outcome = generator.try_generate(&lemma, category, count).await;
                    (category, outcome)
                });
            }
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((category, outcome)) => {
                        results.insert(category, outcome);
                    }
                    Err(err) => log::warn!("Example task for '{lemma}' aborted: {err}"),
                }
            }
        } else {
            for (category, count) in plan.iter() {
                let outcome = self.examples.try_generate(lemma, category, count).await;
                results.insert(category, outcome);
            }
        }

        let mut examples = BTreeMap::new();
        let mut reports = Vec::with_capacity(plan.len());
        for (category, requested) in plan.iter() {
            let outcome = results
                .remove(&category)
                .unwrap_or_else(|| Err(SynthError::Other("example task aborted".to_string())));
            let (generated, error) = match outcome {
                Ok(generated) => (generated, None),
                Err(err) => {
                    log::warn!("Examples for '{lemma}' ({category}) failed: {err}");
                    (Vec::new(), Some(err.to_string()))
                }
            };
            reports.push(CategoryReport {
                category,
                requested,
                produced: generated.len(),
                error,
            });
            examples.insert(category, generated);
        }
        (examples, reports)
    }

    /// Invariants every returned pack satisfies.
    fn finish(&self, pack: &mut WordPack, plan: &ExamplePlan) {
        for category in plan.categories() {
            pack.examples.entry(category).or_default();
        }
        self.fallback.repair(pack);
    }
}

/// In-scope fields from `fresh`, everything else from `previous`.
fn merge_scoped(previous: WordPack, fresh: WordPack, scope: &RegenerateScope) -> WordPack {
    let mut merged = previous;
    merged.lemma = fresh.lemma;
    if scope.covers(PackField::Senses) {
        merged.senses = fresh.senses;
    }
    if scope.covers(PackField::Collocations) {
        merged.collocations = fresh.collocations;
    }
    if scope.covers(PackField::Etymology) {
        merged.etymology = fresh.etymology;
    }
    if scope.covers(PackField::Citations) {
        merged.citations = fresh.citations;
        merged.confidence = fresh.confidence;
    }
    if scope.covers(PackField::Examples) {
        merged.examples.extend(fresh.examples);
    }
    merged.regenerate_scope = fresh.regenerate_scope;
    merged
}
