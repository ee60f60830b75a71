use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use crate::tokenizer::{analyze, AnalyzerConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub type TermId = u32;
/// Position of a document in the corpus.
pub type DocId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub topic: String,
    pub content: String,
}

impl Document {
    pub fn new(topic: impl Into<String>, content: impl Into<String>) -> Self {
        Self { topic: topic.into(), content: content.into() }
    }

    /// The text that gets indexed: topic followed by content.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.topic, self.content)
    }
}

/// Term to dimension mapping. Dimensions follow lexical order of the terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: BTreeMap<String, TermId>,
}

impl Vocabulary {
    fn from_terms<I: IntoIterator<Item = String>>(terms: I) -> Self {
        let sorted: BTreeSet<String> = terms.into_iter().collect();
        let terms = sorted.into_iter().enumerate().map(|(i, t)| (t, i as TermId)).collect();
        Self { terms }
    }

    pub fn get(&self, term: &str) -> Option<TermId> { self.terms.get(term).copied() }
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn terms(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.terms.iter().map(|(t, id)| (t.as_str(), *id))
    }
}

/// Sparse weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Dot product; both sides are unit length, so this is their cosine similarity.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn from_counts(counts: BTreeMap<TermId, u32>, idf: &[f64]) -> Self {
        let mut entries: Vec<(TermId, f64)> = counts
            .into_iter()
            .map(|(tid, tf)| (tid, tf as f64 * idf[tid as usize]))
            .collect();
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() { *w /= norm; }
        }
        Self { entries }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatrix {
    rows: Vec<SparseVector>,
}

impl DocumentMatrix {
    pub fn rows(&self) -> &[SparseVector] { &self.rows }
    pub fn num_rows(&self) -> usize { self.rows.len() }
}

/// Vocabulary, idf weights and document matrix built together from one corpus.
/// The parts are only ever replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfIndex {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    matrix: DocumentMatrix,
    analyzer: AnalyzerConfig,
}

impl TfIdfIndex {
    /// Fit the index over `docs`, in corpus order.
    ///
    /// Terms are unigrams and bigrams of the stopword-filtered text. When there are more
    /// distinct terms than `max_features`, the ones with the highest total count across the
    /// corpus are kept, ties going to the lexically smaller term. Weights use smoothed idf,
    /// `ln((1 + n) / (1 + df)) + 1`, times raw term count, with every row scaled to unit length.
    pub fn build(docs: &[Document], config: &RetrievalConfig) -> Result<Self> {
        if docs.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }
        let analyzer = config.analyzer.clone();
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| analyze(&d.searchable_text(), &analyzer)).collect();

        let mut totals: HashMap<&str, u64> = HashMap::new();
        for terms in &analyzed {
            for term in terms {
                *totals.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if totals.is_empty() {
            return Err(RetrievalError::IndexRebuild("empty vocabulary; the documents only contain stop words".into()));
        }
        if totals.len() > TermId::MAX as usize {
            return Err(RetrievalError::IndexRebuild(format!("{} distinct terms exceed the addressable range", totals.len())));
        }

        let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(config.max_features);
        let vocabulary = Vocabulary::from_terms(ranked.into_iter().map(|(t, _)| t.to_string()));

        let n = docs.len();
        let mut df = vec![0u32; vocabulary.len()];
        let mut counts_per_doc: Vec<BTreeMap<TermId, u32>> = Vec::with_capacity(n);
        for terms in &analyzed {
            let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
            for term in terms {
                if let Some(tid) = vocabulary.get(term) {
                    *counts.entry(tid).or_insert(0) += 1;
                }
            }
            let seen: HashSet<TermId> = counts.keys().copied().collect();
            for tid in seen { df[tid as usize] += 1; }
            counts_per_doc.push(counts);
        }

        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n as f64) / (1.0 + d as f64)).ln() + 1.0)
            .collect();
        let rows = counts_per_doc.into_iter().map(|c| SparseVector::from_counts(c, &idf)).collect();

        tracing::debug!(num_docs = n, num_terms = vocabulary.len(), "built tf-idf index");
        Ok(Self { vocabulary, idf, matrix: DocumentMatrix { rows }, analyzer })
    }

    /// Map free text into this index's term space with the same analysis and weighting
    /// used for documents.
    pub fn project(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in analyze(text, &self.analyzer) {
            match self.vocabulary.get(&term) {
                Some(tid) => *counts.entry(tid).or_insert(0) += 1,
                // Out-of-vocabulary terms carry no weight in any document, so they are skipped.
                None => continue,
            }
        }
        SparseVector::from_counts(counts, &self.idf)
    }

    pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }
    pub fn idf(&self) -> &[f64] { &self.idf }
    pub fn matrix(&self) -> &DocumentMatrix { &self.matrix }
    pub fn num_docs(&self) -> usize { self.matrix.num_rows() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::new("Coral", "Coral reefs bleach in warm water"),
            Document::new("Whales", "Blue whales are the largest animals"),
        ]
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = TfIdfIndex::build(&[], &RetrievalConfig::default()).unwrap_err();
        assert_eq!(err, RetrievalError::EmptyCorpus);
    }

    #[test]
    fn stopword_only_corpus_fails_rebuild() {
        let err = TfIdfIndex::build(&[Document::new("the", "and of the")], &RetrievalConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "index_rebuild");
    }

    #[test]
    fn rows_are_unit_length_and_match_corpus() {
        let index = TfIdfIndex::build(&docs(), &RetrievalConfig::default()).unwrap();
        assert_eq!(index.num_docs(), 2);
        for row in index.matrix().rows() {
            let norm: f64 = row.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let corpus = vec![
            Document::new("ocean", "ocean ocean waves"),
            Document::new("ocean", "tides"),
        ];
        let config = RetrievalConfig { max_features: 1, ..Default::default() };
        let index = TfIdfIndex::build(&corpus, &config).unwrap();
        assert_eq!(index.vocabulary().len(), 1);
        assert_eq!(index.vocabulary().get("ocean"), Some(0));
    }

    #[test]
    fn vocabulary_dimensions_follow_lexical_order() {
        let index = TfIdfIndex::build(&docs(), &RetrievalConfig::default()).unwrap();
        let terms: Vec<&str> = index.vocabulary().terms().map(|(t, _)| t).collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        assert!(index.vocabulary().get("blue whales").is_some());
    }

    #[test]
    fn unknown_query_terms_project_to_nothing() {
        let index = TfIdfIndex::build(&docs(), &RetrievalConfig::default()).unwrap();
        assert!(index.project("volcano glacier").is_empty());
        assert!(!index.project("warm volcano").is_empty());
    }

    #[test]
    fn rebuilding_same_corpus_is_bit_identical() {
        let a = TfIdfIndex::build(&docs(), &RetrievalConfig::default()).unwrap();
        let b = TfIdfIndex::build(&docs(), &RetrievalConfig::default()).unwrap();
        assert_eq!(bincode::serialize(&a).unwrap(), bincode::serialize(&b).unwrap());
    }
}
