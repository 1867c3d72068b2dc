//! Error types for rapport.
//!
//! Scoring and annotation never fail: empty or odd text yields a neutral or
//! empty result. Errors only come from loading external data (rosters,
//! lexicons, configuration) and from checked rendering.

use thiserror::Error;

/// Result type for rapport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rapport operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A lexicon could not be built.
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Configuration is malformed.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from rapport-core, such as a span list that does not cover
    /// its text.
    #[error(transparent)]
    Core(#[from] rapport_core::Error),
}

impl Error {
    /// Create a lexicon error.
    pub fn lexicon(msg: impl Into<String>) -> Self {
        Error::Lexicon(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
