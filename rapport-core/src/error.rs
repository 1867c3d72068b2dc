//! Error types for rapport-core.

use thiserror::Error;

/// Result type for rapport-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rapport-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A span list does not cover its source text.
    #[error("Invalid spans: {0}")]
    InvalidSpans(String),
}

impl Error {
    /// Create an invalid spans error.
    #[must_use]
    pub fn invalid_spans(msg: impl Into<String>) -> Self {
        Self::InvalidSpans(msg.into())
    }
}
