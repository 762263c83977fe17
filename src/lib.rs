//! # mkdlint-lsp
//!
//! A language server that plugs [mkdlint](https://crates.io/crates/mkdlint)
//! into any editor speaking the Language Server Protocol.
//!
//! ## Features
//!
//! - **Diagnostics** for every open markdown document, refreshed on each edit
//! - **Quick fixes** for individual violations
//! - **Fix all** for a whole document in a single edit
//! - **Layered configuration**: built-in defaults, a global config, the
//!   nearest `.markdownlint.{json,yaml,yml}` and editor settings
//!
//! ## Configuration
//!
//! Editor settings are read from `initializationOptions`:
//!
//! ```json
//! {
//!   "markdownlint": {
//!     "config": {
//!       "MD033": { "allowed_elements": ["br"] }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library use
//!
//! ```rust,no_run
//! use mkdlint_lsp::config::ConfigLoader;
//! use mkdlint_lsp::engine::{self, MkdlintEngine};
//!
//! let load = ConfigLoader::new().with_workspace_root(".").load();
//! let results = engine::invoke(&MkdlintEngine::new(), "README.md", "#Title\n", &load.config)?;
//! for result in &results {
//!     println!("{}", result);
//! }
//! # Ok::<(), mkdlint_lsp::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod lsp;
pub mod types;

// Re-export main types and functions
pub use config::{ConfigLoad, ConfigLoader, EffectiveConfig};
pub use engine::{MkdlintEngine, RuleEngine};
pub use types::{Error, FixDescriptor, LintResult, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
