use anyhow::Result;
use axum::Router;
use clap::Parser;
use retrieval_core::persist::{load_corpus, KnowledgePaths};
use retrieval_core::seed::ocean_facts;
use retrieval_core::{KnowledgeBase, RetrievalConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use retrieval_server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Knowledge directory holding corpus.json; the built-in ocean facts are used when omitted
    #[arg(long)]
    knowledge: Option<String>,
    /// Write additions back to the knowledge directory
    #[arg(long, default_value_t = false)]
    persist: bool,
    /// JSON file with retrieval settings (max_features, min_score, default_top_k, analyzer)
    #[arg(long)]
    config: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8001)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RetrievalConfig::from_json_file(path)?,
        None => RetrievalConfig::default(),
    };
    let docs = match &args.knowledge {
        Some(dir) => load_corpus(&KnowledgePaths::new(dir))?,
        None => ocean_facts(),
    };
    let kb = Arc::new(KnowledgeBase::with_documents(config, docs)?);
    tracing::info!(documents = kb.len(), "vectorizer initialized");

    let persist_dir = match (&args.knowledge, args.persist) {
        (Some(dir), true) => Some(PathBuf::from(dir)),
        (None, true) => anyhow::bail!("--persist requires --knowledge"),
        _ => None,
    };
    let app: Router = build_app(kb, persist_dir);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
