use crate::call::complete_with_timeout;
use crate::error::Result;
use crate::prompts::build_example_prompt;
use crate::sanitizer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wordpack_llm::LlmClient;
use wordpack_protocol::{Example, ExampleCategory};

/// Generates example sentences for one register category per LLM call.
#[derive(Clone)]
pub struct ExampleGenerator {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl ExampleGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// At most `count` examples; fewer if the model returned fewer, empty on failure.
    pub async fn generate(
        &self,
        lemma: &str,
        category: ExampleCategory,
        count: usize,
    ) -> Vec<Example> {
        match self.try_generate(lemma, category, count).await {
            Ok(examples) => examples,
            Err(err) => {
                log::warn!("Example generation for '{lemma}' ({category}) failed: {err}");
                Vec::new()
            }
        }
    }

    pub async fn try_generate(
        &self,
        lemma: &str,
        category: ExampleCategory,
        count: usize,
    ) -> Result<Vec<Example>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let prompt = build_example_prompt(lemma, category, count);
        let reply = complete_with_timeout(self.llm.as_ref(), &prompt, self.timeout).await?;
        let document = sanitizer::parse(&reply)?;

        let mut examples = examples_from_document(&document);
        if examples.len() > count {
            log::debug!(
                "Model returned {} {category} examples for '{lemma}', keeping {count}",
                examples.len()
            );
            examples.truncate(count);
        }
        Ok(examples)
    }
}

fn examples_from_document(document: &Value) -> Vec<Example> {
    let items = match document {
        Value::Object(obj) => obj.get("examples").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };
    items
        .map(|items| items.iter().filter_map(example_from_item).collect())
        .unwrap_or_default()
}

fn example_from_item(item: &Value) -> Option<Example> {
    let (en, ja) = match item {
        Value::String(en) => (en.as_str(), ""),
        Value::Object(obj) => (
            obj.get("en").and_then(Value::as_str)?,
            obj.get("ja").and_then(Value::as_str).unwrap_or_default(),
        ),
        _ => return None,
    };
    let en = en.trim();
    if en.is_empty() {
        return None;
    }
    Some(Example {
        en: en.to_string(),
        ja: ja.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wordpack_llm::ScriptedLlm;

    fn generator(llm: ScriptedLlm) -> (ExampleGenerator, Arc<ScriptedLlm>) {
        let llm = Arc::new(llm);
        (
            ExampleGenerator::new(llm.clone(), Duration::from_secs(5)),
            llm,
        )
    }

    #[tokio::test]
    async fn two_well_formed_items_keep_embedded_newlines() {
        let reply = "{\"examples\": [\
            {\"en\": \"We mitigate risk.\nThen we ship.\", \"ja\": \"リスクを緩和する。\"},\
            {\"en\": \"Caching mitigates latency.\", \"ja\": \"キャッシュで遅延を緩和する。\"}]}";
        let (generator, llm) = generator(ScriptedLlm::new().on("Register (Dev)", reply));

        let examples = generator
            .generate("mitigate", ExampleCategory::Dev, 2)
            .await;
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].en, "We mitigate risk.\nThen we ship.");
        assert!(examples[0].en.contains('\n'));
        assert_eq!(llm.calls(), 1);
        assert!(llm.prompts()[0].contains("Return exactly 2 items"));
    }

    #[tokio::test]
    async fn shortfall_returns_what_was_parsed() {
        let reply = r#"{"examples": [{"en": "Only one.", "ja": "一つだけ。"}]}"#;
        let (generator, llm) = generator(ScriptedLlm::new().otherwise(reply));
        let examples = generator
            .generate("mitigate", ExampleCategory::Business, 3)
            .await;
        assert_eq!(examples.len(), 1);
        assert_eq!(llm.calls(), 1, "no retry-until-full loop");
    }

    #[tokio::test]
    async fn surplus_is_truncated_to_count() {
        let reply = r#"{"examples": [{"en": "a"}, {"en": "b"}, {"en": "c"}]}"#;
        let (generator, _) = generator(ScriptedLlm::new().otherwise(reply));
        let examples = generator.generate("x", ExampleCategory::Common, 2).await;
        let en: Vec<&str> = examples.iter().map(|e| e.en.as_str()).collect();
        assert_eq!(en, vec!["a", "b"]);
        assert_eq!(examples[0].ja, "");
    }

    #[tokio::test]
    async fn malformed_reply_yields_empty_and_error() {
        let (generator, _) = generator(ScriptedLlm::new().otherwise("I cannot help with that."));
        assert!(generator
            .generate("mitigate", ExampleCategory::Cs, 2)
            .await
            .is_empty());
        assert!(matches!(
            generator.try_generate("mitigate", ExampleCategory::Cs, 2).await,
            Err(crate::SynthError::MalformedLlmOutput(_))
        ));
    }

    #[tokio::test]
    async fn upstream_failure_yields_empty() {
        let (generator, _) = generator(ScriptedLlm::new().fail_on("Register (LLM)"));
        assert!(generator
            .generate("token", ExampleCategory::Llm, 2)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn zero_count_skips_the_call() {
        let (generator, llm) = generator(ScriptedLlm::new().otherwise("{}"));
        assert!(generator
            .generate("x", ExampleCategory::Dev, 0)
            .await
            .is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let llm = Arc::new(
            ScriptedLlm::new()
                .otherwise(r#"{"examples": [{"en": "late"}]}"#)
                .with_delay(Duration::from_millis(200)),
        );
        let generator = ExampleGenerator::new(llm, Duration::from_millis(10));
        let err = generator
            .try_generate("x", ExampleCategory::Dev, 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::SynthError::Upstream(wordpack_llm::LlmError::Timeout(10))
        ));
    }

    #[test]
    fn bare_arrays_and_strings_are_accepted() {
        let doc = serde_json::json!(["plain sentence", {"en": " padded ", "ja": "訳"}, {"ja": "no en"}, 5]);
        let examples = examples_from_document(&doc);
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].en, "plain sentence");
        assert_eq!(examples[1].en, "padded");
    }
}
