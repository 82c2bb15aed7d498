use wordpack_lexicon::{LexicalFilter, TermClass};

#[test]
fn article_candidates_reduce_to_learnable_vocabulary() {
    let candidates = vec![
        "The".to_string(),
        "quarterly".to_string(),
        "revenue".to_string(),
        "forecast".to_string(),
        "was".to_string(),
        "revised".to_string(),
        "after".to_string(),
        "supply chain".to_string(),
        "disruptions".to_string(),
        "Thanks".to_string(),
        "2024".to_string(),
    ];

    let kept = LexicalFilter::new().filter(&candidates);
    assert_eq!(
        kept,
        vec![
            "quarterly",
            "revenue",
            "forecast",
            "revised",
            "supply chain",
            "disruptions",
        ]
    );
}

#[test]
fn filter_is_deterministic_and_never_grows() {
    let filter = LexicalFilter::new();
    let candidates = ["hello", "idempotent", "good morning", "hello", "gradient descent"];
    let first = filter.filter(&candidates);
    let second = filter.filter(&candidates);
    assert_eq!(first, second);
    assert!(first.len() <= candidates.len());
    assert_eq!(first, vec!["idempotent", "gradient descent"]);
    assert_eq!(filter.classify("gradient descent"), TermClass::Domain);
}
