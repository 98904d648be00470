//! Error types for autodiag-search
//!
//! These never leave the crate's public link lookups; they are logged and
//! turned into empty results.

use thiserror::Error;

/// Search error type
#[derive(Debug, Error)]
pub enum Error {
    /// Search URL could not be built
    #[error("invalid search url: {0}")]
    Url(#[from] url::ParseError),

    /// Fetching the results page failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
