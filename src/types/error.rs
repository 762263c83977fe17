//! Error types for the language server

use std::path::PathBuf;

/// Main error type for mkdlint-lsp operations
///
/// None of these errors is ever surfaced to the editor as a failed request.
/// Config errors are collected and logged while loading continues, engine
/// errors degrade to an empty result set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No workspace root was provided by the client
    #[error("No workspace root folder; skipping project config discovery")]
    MissingRoot,

    /// A config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be parsed
    #[error("Failed to parse config file {path}: {message}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Editor settings carried an invalid override
    #[error("Invalid editor settings: {0}")]
    Settings(String),

    /// The lint engine failed or panicked
    #[error("Lint engine failure: {0}")]
    Engine(String),
}

/// Result type alias for mkdlint-lsp operations
pub type Result<T> = std::result::Result<T, Error>;
