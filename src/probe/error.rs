use thiserror::Error;

/// Failures that turn a probe into an `INVALID_OR_UNREACHABLE` verdict.
///
/// The `Display` text is reported verbatim in the verdict's `error` field.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Deadline fired before the endpoint answered; the fetch was aborted.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Endpoint returned non-2xx status: {0}")]
    Status(u16),

    /// Connect, TLS, or request-construction failure.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Invalid JSON in response body: {0}")]
    Json(#[from] serde_json::Error),
}
