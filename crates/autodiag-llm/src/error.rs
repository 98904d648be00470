//! Error types for autodiag-llm

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Required credential is missing
    #[error("Missing {0}")]
    Configuration(String),

    /// Provider answered with a non-success status
    #[error("{provider} error: {status} {body}")]
    Upstream {
        /// Provider display name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Success response that was not JSON
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Unknown provider identifier
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
