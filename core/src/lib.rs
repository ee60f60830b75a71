//! In-memory tf-idf retrieval over a small knowledge base of topic/content passages.

pub mod config;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod persist;
pub mod query;
pub mod seed;
pub mod tokenizer;

pub use config::RetrievalConfig;
pub use error::{Result, RetrievalError};
pub use index::{DocId, Document, TermId, TfIdfIndex};
pub use knowledge::{AddOutcome, KnowledgeBase, KnowledgeListing};
pub use query::{RetrievalQuery, RetrievalResult, RetrieveRequest};
