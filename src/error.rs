//! Error types for the timeline service.
//!
//! `RenderError` is raised by the tweet rendering pipeline when upstream data
//! breaks its input contract. `ApiError` covers everything that can go wrong
//! while talking to the Twitter/X API through the signed request client.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while projecting raw tweets into rendered tweets.
#[derive(Error, Debug)]
pub enum RenderError {
    /// An entity claims text that does not occur in the tweet body.
    #[error("{kind} entity '{text}' not found in text")]
    MissingEntity { kind: &'static str, text: String },

    /// The `created_at` field could not be parsed.
    #[error("invalid timestamp: {value}")]
    InvalidDate { value: String },

    /// The quote chain is deeper than any real tweet can be.
    #[error("quoted tweet chain exceeds {depth} levels")]
    QuoteDepthExceeded { depth: usize },

    /// An entity pattern could not be compiled.
    #[error("entity pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by the signed request client and the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// OAuth signature generation or token exchange failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Twitter API returned a non-success status
    #[error("Twitter API error {status}")]
    Upstream { status: u16, body: Value },

    /// The `x-authorization` header is missing or malformed
    #[error("missing or malformed x-authorization header")]
    MissingAuthorization,

    /// The timeline payload could not be rendered
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
