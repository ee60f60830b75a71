use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use crate::index::{Document, TfIdfIndex};
use crate::query::{collect_results, rank, RetrievalResult, RetrieveRequest};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::Serialize;
use std::sync::Arc;

/// A corpus together with the index built from it.
struct Snapshot {
    corpus: Arc<Vec<Document>>,
    index: Arc<TfIdfIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeListing {
    pub documents: usize,
    pub entries: Vec<Document>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub total_documents: usize,
}

/// Shared knowledge base: a corpus plus its tf-idf index, readable from many
/// threads at once.
///
/// Readers always see a corpus and index that were published together. Additions are
/// serialized with each other; while one rebuilds, readers keep using the previous snapshot
/// until the new one is swapped in.
pub struct KnowledgeBase {
    config: RetrievalConfig,
    state: RwLock<Option<Snapshot>>,
}

impl KnowledgeBase {
    /// An empty knowledge base. Queries fail with `NotReady` until [`load`](Self::load)
    /// or [`add_knowledge`](Self::add_knowledge) succeeds.
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config, state: RwLock::new(None) }
    }

    /// Build a ready knowledge base over `docs`.
    pub fn with_documents(config: RetrievalConfig, docs: Vec<Document>) -> Result<Self> {
        let kb = Self::new(config);
        kb.load(docs)?;
        Ok(kb)
    }

    pub fn config(&self) -> &RetrievalConfig { &self.config }

    pub fn is_ready(&self) -> bool { self.state.read().is_some() }

    /// Replace the whole corpus. On failure the previous snapshot stays published.
    pub fn load(&self, docs: Vec<Document>) -> Result<()> {
        let guard = self.state.upgradable_read();
        let index = TfIdfIndex::build(&docs, &self.config)?;
        let snapshot = Snapshot { corpus: Arc::new(docs), index: Arc::new(index) };
        let mut writer = RwLockUpgradableReadGuard::upgrade(guard);
        tracing::info!(documents = snapshot.corpus.len(), terms = snapshot.index.vocabulary().len(), "knowledge base indexed");
        *writer = Some(snapshot);
        Ok(())
    }

    pub fn retrieve(&self, request: RetrieveRequest) -> Result<RetrievalResult> {
        let query = request.validate(&self.config)?;
        let (corpus, index) = {
            let state = self.state.read();
            let snapshot = state.as_ref().ok_or(RetrievalError::NotReady)?;
            (Arc::clone(&snapshot.corpus), Arc::clone(&snapshot.index))
        };
        let hits = rank(&index, &query, self.config.min_score);
        tracing::debug!(query = %query.query, top_k = query.top_k, hits = hits.len(), "retrieve");
        Ok(collect_results(&corpus, &hits))
    }

    /// Append a document and re-index the full corpus before returning.
    pub fn add_knowledge(&self, topic: &str, content: &str) -> Result<AddOutcome> {
        if topic.trim().is_empty() {
            return Err(RetrievalError::invalid("topic must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(RetrievalError::invalid("content must not be empty"));
        }

        let guard = self.state.upgradable_read();
        let mut docs: Vec<Document> = guard.as_ref().map(|s| s.corpus.as_ref().clone()).unwrap_or_default();
        docs.push(Document::new(topic, content));

        let index = match TfIdfIndex::build(&docs, &self.config) {
            Ok(index) => index,
            Err(err) => {
                tracing::warn!(error = %err, topic, "re-index failed; keeping previous index");
                return Err(match err {
                    RetrievalError::IndexRebuild(_) => err,
                    other => RetrievalError::IndexRebuild(other.to_string()),
                });
            }
        };
        let total_documents = docs.len();
        let mut writer = RwLockUpgradableReadGuard::upgrade(guard);
        *writer = Some(Snapshot { corpus: Arc::new(docs), index: Arc::new(index) });
        tracing::info!(topic, total_documents, "knowledge added");
        Ok(AddOutcome { total_documents })
    }

    pub fn list_knowledge(&self) -> KnowledgeListing {
        let state = self.state.read();
        let entries = state.as_ref().map(|s| s.corpus.as_ref().clone()).unwrap_or_default();
        KnowledgeListing { documents: entries.len(), entries }
    }

    pub fn len(&self) -> usize {
        self.state.read().as_ref().map(|s| s.corpus.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Current corpus, for persisting.
    pub fn documents(&self) -> Vec<Document> {
        self.list_knowledge().entries
    }
}
