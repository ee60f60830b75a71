use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retrieval_core::persist::{load_knowledge, save_corpus, save_index, save_meta, KnowledgePaths, MetaFile};
use retrieval_core::query::{collect_results, rank};
use retrieval_core::seed::ocean_facts;
use retrieval_core::{Document, RetrievalConfig, RetrieveRequest, TfIdfIndex};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    topic: String,
    content: String,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a TF-IDF knowledge directory", long_about = None)]
struct Cli {
    /// JSON file with retrieval settings
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a knowledge directory from JSON/JSONL files or a directory of them
    Build {
        /// Input path (file or directory); the built-in ocean facts are used when omitted
        #[arg(long)]
        input: Option<String>,
        /// Output knowledge directory
        #[arg(long)]
        output: String,
    },
    /// Run a query against a built knowledge directory
    Query {
        /// Knowledge directory
        #[arg(long)]
        index: String,
        /// Query text
        #[arg(long)]
        q: String,
        /// Number of results
        #[arg(long)]
        k: Option<i64>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RetrievalConfig::from_json_file(path)?,
        None => RetrievalConfig::default(),
    };

    match cli.command {
        Commands::Build { input, output } => {
            let docs = match input {
                Some(input) => read_documents(Path::new(&input))?,
                None => ocean_facts(),
            };
            build_knowledge(docs, &output, &config)
        }
        Commands::Query { index, q, k } => {
            let (docs, index, _meta) = load_knowledge(&KnowledgePaths::new(&index))?;
            let query = RetrieveRequest { query: q, top_k: k }.validate(&config)?;
            let hits = rank(&index, &query, config.min_score);
            let result = collect_results(&docs, &hits);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn build_knowledge(docs: Vec<Document>, output: &str, config: &RetrievalConfig) -> Result<()> {
    let out_paths = KnowledgePaths::new(output);
    tracing::info!(num_docs = docs.len(), "ingested documents");

    let index = TfIdfIndex::build(&docs, config)?;
    save_corpus(&out_paths, &docs)?;
    save_index(&out_paths, &index)?;
    let meta = MetaFile {
        num_docs: docs.len(),
        num_terms: index.vocabulary().len(),
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, num_terms = meta.num_terms, "knowledge build complete");
    Ok(())
}

/// Collect documents from a file or every .json/.jsonl file below a directory, in path order.
fn read_documents(input_path: &Path) -> Result<Vec<Document>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input_path.display());
    }

    let mut docs = Vec::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &mut docs)?;
        } else {
            read_json(&file, &mut docs)?;
        }
    }
    Ok(docs)
}

fn read_jsonl(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        ingest_doc(doc, file, docs);
    }
    Ok(())
}

/// Accepts a single document, an array of documents, or a `{"entries": [...]}` listing.
fn read_json(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let raw = fs::read_to_string(file)?;
    let json: serde_json::Value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;
    let items = match json {
        serde_json::Value::Array(arr) => arr,
        serde_json::Value::Object(mut obj) => match obj.remove("entries") {
            Some(serde_json::Value::Array(arr)) => arr,
            _ => vec![serde_json::Value::Object(obj)],
        },
        _ => Vec::new(),
    };
    for v in items {
        let doc: InputDoc = serde_json::from_value(v).with_context(|| format!("parsing {}", file.display()))?;
        ingest_doc(doc, file, docs);
    }
    Ok(())
}

fn ingest_doc(doc: InputDoc, file: &Path, docs: &mut Vec<Document>) {
    if doc.topic.trim().is_empty() || doc.content.trim().is_empty() {
        tracing::warn!(file = %file.display(), topic = %doc.topic, "skipping document with empty topic or content");
        return;
    }
    docs.push(Document::new(doc.topic, doc.content));
}
