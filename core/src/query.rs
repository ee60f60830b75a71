use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use crate::index::{DocId, Document, TfIdfIndex};
use serde::{Deserialize, Serialize};

/// A retrieval request as received from a caller. `top_k` is signed so that
/// negative values reach validation instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<i64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalQuery {
    pub query: String,
    pub top_k: usize,
}

impl RetrieveRequest {
    pub fn validate(self, config: &RetrievalConfig) -> Result<RetrievalQuery> {
        if self.query.trim().is_empty() {
            return Err(RetrievalError::invalid("query must not be empty"));
        }
        let top_k = match self.top_k {
            None => config.default_top_k,
            Some(k) if k > 0 => k as usize,
            Some(k) => return Err(RetrievalError::invalid(format!("top_k must be positive, got {k}"))),
        };
        Ok(RetrievalQuery { query: self.query, top_k })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Contexts and their scores, index-aligned and best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub contexts: Vec<Document>,
    pub scores: Vec<f64>,
}

/// Rank every document of `index` against `query`.
///
/// Ordering is by descending cosine similarity with ties kept in corpus order. The first
/// `top_k` are taken and anything not scoring above `min_score` is dropped from those.
pub fn rank(index: &TfIdfIndex, query: &RetrievalQuery, min_score: f64) -> Vec<ScoredDoc> {
    let q = index.project(&query.query);
    if q.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<ScoredDoc> = index
        .matrix()
        .rows()
        .iter()
        .enumerate()
        .map(|(doc_id, row)| ScoredDoc { doc_id, score: row.dot(&q).clamp(0.0, 1.0) })
        .collect();
    // stable: equal scores stay in corpus order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(query.top_k);
    scored.retain(|s| s.score > min_score);
    scored
}

/// Resolve ranked hits against the corpus they were ranked over.
pub fn collect_results(corpus: &[Document], hits: &[ScoredDoc]) -> RetrievalResult {
    let mut result = RetrievalResult::default();
    for hit in hits {
        if let Some(doc) = corpus.get(hit.doc_id) {
            result.contexts.push(doc.clone());
            result.scores.push(hit.score);
        }
    }
    result
}
