//! helpcenter CLI: Help Center article search and retrieval.
//!
//! Serves the same two operations through an interactive console,
//! one-shot commands, and an MCP tool server on stdio.

mod commands;
mod console;
mod mcp;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
