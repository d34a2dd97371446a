use anyhow::Context as _;
use clap::Parser;
use kb_search::cli::Cli;
use kb_search::{EngineConfig, KbServer, KnowledgeBaseFinder, corpus};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> kb_search::Result<()> {
    // stdout carries the MCP protocol; logs go to stderr
    kb_search::tracing::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => EngineConfig::default(),
    };

    let documents = match &cli.documents {
        Some(path) => corpus::load_documents(path)
            .with_context(|| format!("failed to load documents from {}", path))?,
        None => Vec::new(),
    };

    let finder = KnowledgeBaseFinder::from_config(&config, documents);
    tracing::info!(
        "Starting kb-search MCP server with {} documents",
        finder.index().document_count()
    );

    let server = KbServer::new(finder);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
