//! mkdlint Language Server Protocol (LSP) server
//!
//! This binary provides LSP support for mkdlint, enabling real-time
//! linting in editors like VS Code, Neovim, and others.

use clap::Parser;
use mkdlint_lsp::lsp::MkdlintLanguageServer;
use tower_lsp::{LspService, Server};

/// Markdown lint language server (speaks LSP over stdio)
#[derive(Debug, Parser)]
#[command(name = "mkdlint-lsp", version, about)]
struct Args {
    /// Use stdio transport (the only transport; accepted for client compatibility)
    #[arg(long)]
    stdio: bool,

    /// Log filter for stderr output (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging to stderr (stdout is used for LSP communication)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .target(env_logger::Target::Stderr)
        .try_init()?;

    log::debug!("starting mkdlint-lsp {} (stdio: {})", mkdlint_lsp::VERSION, args.stdio);

    // Create stdio transport
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    // Create the LSP service
    let (service, socket) = LspService::new(MkdlintLanguageServer::new);

    // Run the server
    Server::new(stdin, stdout, socket).serve(service).await;
    Ok(())
}
