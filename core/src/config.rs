use crate::tokenizer::AnalyzerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_FEATURES: usize = 1000;
pub const DEFAULT_MIN_SCORE: f64 = 0.1;
pub const DEFAULT_TOP_K: usize = 2;

/// Tunables for indexing and ranking. Every field has a default, so a partial
/// JSON file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Upper bound on vocabulary size; the most frequent terms across the corpus are kept.
    pub max_features: usize,
    /// Results must score strictly above this to be returned.
    pub min_score: f64,
    /// Used when a query does not name its own `top_k`.
    pub default_top_k: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            min_score: DEFAULT_MIN_SCORE,
            default_top_k: DEFAULT_TOP_K,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RetrievalConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_features > 0, "max_features must be positive");
        anyhow::ensure!(self.default_top_k > 0, "default_top_k must be positive");
        anyhow::ensure!((0.0..1.0).contains(&self.min_score), "min_score must be in [0, 1)");
        anyhow::ensure!(
            self.analyzer.min_ngram >= 1 && self.analyzer.min_ngram <= self.analyzer.max_ngram,
            "ngram range must satisfy 1 <= min_ngram <= max_ngram"
        );
        Ok(())
    }
}
