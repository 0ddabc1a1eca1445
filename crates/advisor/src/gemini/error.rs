//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gemini API returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// Status string from the API (e.g. `INVALID_ARGUMENT`).
        status: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The prompt was blocked before any candidate was produced.
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The response carried no text.
    #[error("empty response (finish reason: {0})")]
    EmptyResponse(String),

    /// The API key cannot be sent as a header value.
    #[error("invalid API key: contains characters not allowed in headers")]
    InvalidApiKey,

    /// The configured endpoint could not be combined with the model name.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// API error envelope returned by Gemini.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// HTTP status code echoed by the API.
    pub code: u16,
    /// Error message.
    pub message: String,
    /// Canonical status name.
    #[serde(default)]
    pub status: String,
}
