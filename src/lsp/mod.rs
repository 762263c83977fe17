//! Language Server Protocol (LSP) implementation for mkdlint
//!
//! This module provides the LSP server with:
//! - Diagnostics on file open/edit/save, replaced wholesale on every lint
//! - Quick fixes for fixable violations
//! - A whole-document fix (`mkdlint.fixAll` command and `source.fixAll`)
//! - Config discovery once at startup
//!
//! # Example
//!
//! ```ignore
//! # use mkdlint_lsp::lsp::MkdlintLanguageServer;
//! # use tower_lsp::{LspService, Server};
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stdin = tokio::io::stdin();
//! let stdout = tokio::io::stdout();
//!
//! let (service, socket) = LspService::new(|client| {
//!     MkdlintLanguageServer::new(client)
//! });
//!
//! Server::new(stdin, stdout, socket).serve(service).await;
//! # Ok(())
//! # }
//! ```

mod backend;
pub mod code_actions;
pub mod diagnostics;
mod document;
mod output;
mod utils;

pub use backend::MkdlintLanguageServer;
pub use code_actions::FIX_ALL_COMMAND;
pub use document::MARKDOWN_LANGUAGE_ID;
