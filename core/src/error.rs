use thiserror::Error;

/// Failures surfaced by the retrieval core. Every variant carries a stable
/// machine-readable [`kind`](RetrievalError::kind) next to its message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,
    #[error("the knowledge base has not been indexed yet")]
    NotReady,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("index rebuild failed: {0}")]
    IndexRebuild(String),
}

impl RetrievalError {
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalError::EmptyCorpus => "empty_corpus",
            RetrievalError::NotReady => "not_ready",
            RetrievalError::InvalidInput(_) => "invalid_input",
            RetrievalError::IndexRebuild(_) => "index_rebuild",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RetrievalError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
