use crate::index::{Document, TfIdfIndex};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct CorpusFile {
    entries: Vec<Document>,
}

/// Layout of a knowledge directory: `corpus.json`, `index.bin` and `meta.json`.
pub struct KnowledgePaths {
    pub root: PathBuf,
}

impl KnowledgePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn corpus(&self) -> PathBuf { self.root.join("corpus.json") }
    fn index(&self) -> PathBuf { self.root.join("index.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

/// Write the corpus to a unique temp file in the same directory and rename it into place,
/// so readers only ever see a complete `corpus.json`.
pub fn save_corpus(paths: &KnowledgePaths, docs: &[Document]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let json = serde_json::to_string_pretty(&CorpusFile { entries: docs.to_vec() })?;
    let mut tmp = NamedTempFile::new_in(&paths.root)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(paths.corpus()).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_corpus(paths: &KnowledgePaths) -> Result<Vec<Document>> {
    let mut f = File::open(paths.corpus()).with_context(|| format!("opening {}", paths.corpus().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let corpus: CorpusFile = serde_json::from_str(&buf)?;
    Ok(corpus.entries)
}

pub fn save_index(paths: &KnowledgePaths, index: &TfIdfIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.index())?;
    let bytes = bincode::serialize(index)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_index(paths: &KnowledgePaths) -> Result<TfIdfIndex> {
    let mut f = File::open(paths.index()).with_context(|| format!("opening {}", paths.index().display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let index = bincode::deserialize(&buf)?;
    Ok(index)
}

pub fn save_meta(paths: &KnowledgePaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &KnowledgePaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Load everything an offline query needs: corpus, index and meta.
/// Fails if the index was not built from this corpus.
pub fn load_knowledge(paths: &KnowledgePaths) -> Result<(Vec<Document>, TfIdfIndex, MetaFile)> {
    let docs = load_corpus(paths)?;
    let index = load_index(paths)?;
    let meta = load_meta(paths)?;
    anyhow::ensure!(
        index.num_docs() == docs.len(),
        "index covers {} documents but corpus has {}",
        index.num_docs(),
        docs.len()
    );
    Ok((docs, index, meta))
}
