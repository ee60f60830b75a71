use retrieval_core::tokenizer::{analyze, tokenize, AnalyzerConfig};

#[test]
fn it_normalizes_and_lowercases() {
    let cfg = AnalyzerConfig { nfkc: true, ..Default::default() };
    let toks = tokenize("Hydrothermal VENTS reach 400°C in the ﬁssures", &cfg);
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(words.contains(&"vents".to_string()));
    // NFKC folds the ligature
    assert!(words.contains(&"fissures".to_string()));
    assert!(words.contains(&"400".to_string()));
}

#[test]
fn compatibility_characters_are_kept_by_default() {
    let terms = analyze("basalt ﬁssures", &AnalyzerConfig::default());
    assert!(terms.contains(&"ﬁssures".to_string()));
    assert!(!terms.contains(&"fissures".to_string()));

    let folded = analyze("basalt ﬁssures", &AnalyzerConfig { nfkc: true, ..Default::default() });
    assert!(folded.contains(&"fissures".to_string()));
    assert!(folded.contains(&"basalt fissures".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let toks = tokenize("The quick brown fox and the lazy dog", &AnalyzerConfig::default());
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn stemming_is_opt_in() {
    let cfg = AnalyzerConfig { stem: true, ..Default::default() };
    let terms = analyze("Running currents", &cfg);
    assert!(terms.contains(&"run".to_string()));
    assert!(terms.contains(&"run current".to_string()));
    let plain = analyze("Running currents", &AnalyzerConfig::default());
    assert!(plain.contains(&"running".to_string()));
}

#[test]
fn bigrams_skip_over_removed_stopwords() {
    let terms = analyze("Tube worms and giant clams", &AnalyzerConfig::default());
    assert!(terms.contains(&"worms giant".to_string()));
}

#[test]
fn unigram_only_range() {
    let cfg = AnalyzerConfig { min_ngram: 1, max_ngram: 1, ..Default::default() };
    let terms = analyze("giant squid", &cfg);
    assert_eq!(terms, vec!["giant", "squid"]);
}
