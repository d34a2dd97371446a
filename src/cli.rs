use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "kb-search")]
#[command(about = "Knowledge-base search server for AI assistants", long_about = None)]
pub struct Cli {
    /// Documents to index at startup: a JSON array or JSON lines, one document per line
    #[arg(short, long)]
    pub documents: Option<String>,

    /// TOML configuration (field weights, tokenizer, knowledge-base weights)
    #[arg(short, long)]
    pub config: Option<String>,
}
