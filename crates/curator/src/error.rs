//! Error types for the curator library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for curation operations.
#[derive(Debug, Error)]
pub enum CurateError {
    /// Missing or invalid configuration (credentials, numeric settings).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web search failed (non-2xx status, transport error or timeout).
    #[error("Search error: {0}")]
    Search(String),

    /// Fetching or cleaning a web page failed.
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// The generative-model provider returned an error.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Research produced nothing to curate.
    #[error("No resources found: {0}")]
    NoResources(String),

    /// Caller supplied unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CurateError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CurateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for curation operations.
pub type Result<T> = std::result::Result<T, CurateError>;
