//! Error types for image generation.

use std::time::Duration;

/// Errors that can occur while preparing or executing a generation request.
#[derive(Debug, thiserror::Error)]
pub enum WeaverError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Billing problem on the provider account.
    #[error("billing error: {0}")]
    Billing(String),

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No provider registered under the given identifier.
    #[error("unknown API provider: {0}")]
    UnknownProvider(String),

    /// Provider is registered but its integration is not implemented.
    #[error("{0} integration is not yet available")]
    ProviderUnavailable(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// I/O error (e.g., saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for image generation operations.
pub type Result<T> = std::result::Result<T, WeaverError>;

/// Reads a `Retry-After` header as whole seconds, if present and numeric.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Trims provider error bodies to a displayable single line.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    const MAX_LEN: usize = 500;
    let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &line[..end])
    } else {
        line
    }
}
