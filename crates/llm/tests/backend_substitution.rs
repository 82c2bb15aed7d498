use std::sync::Arc;
use wordpack_llm::{
    LlmClient, LlmError, NoopRetriever, OfflineLlm, RetrievedSnippet, Retriever, ScriptedLlm,
    StaticRetriever,
};

async fn describe(llm: &dyn LlmClient, retriever: &dyn Retriever, lemma: &str) -> String {
    let context = retriever.query(lemma).await.unwrap_or_default();
    let prompt = format!("lemma={lemma} snippets={}", context.len());
    match llm.complete(&prompt).await {
        Ok(text) => text,
        Err(err) => format!("fallback ({err})"),
    }
}

#[tokio::test]
async fn backends_are_interchangeable_behind_traits() {
    let scripted: Arc<dyn LlmClient> = Arc::new(ScriptedLlm::new().on("snippets=1", "grounded"));
    let offline: Arc<dyn LlmClient> = Arc::new(OfflineLlm);
    let corpus: Arc<dyn Retriever> = Arc::new(StaticRetriever::new(vec![RetrievedSnippet::new(
        "Cache invalidation is hard.",
        "wiki",
    )]));
    let empty: Arc<dyn Retriever> = Arc::new(NoopRetriever);

    assert_eq!(describe(scripted.as_ref(), corpus.as_ref(), "cache").await, "grounded");
    assert!(describe(scripted.as_ref(), empty.as_ref(), "cache")
        .await
        .starts_with("fallback"));
    assert!(describe(offline.as_ref(), corpus.as_ref(), "cache")
        .await
        .starts_with("fallback"));
}

#[tokio::test]
async fn scripted_delay_can_be_bounded_by_caller() {
    let slow = ScriptedLlm::new()
        .otherwise("late")
        .with_delay(std::time::Duration::from_millis(200));
    let outcome =
        tokio::time::timeout(std::time::Duration::from_millis(20), slow.complete("x")).await;
    assert!(outcome.is_err());

    let err = LlmError::Timeout(20);
    assert_eq!(err.to_string(), "Timed out after 20 ms");
}
