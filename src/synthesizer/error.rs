//! Answer generation error types.

use thiserror::Error;

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors from the LLM call that produces the final answer.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was provided
    #[error("No API key configured for the LLM endpoint")]
    MissingCredential,

    /// HTTP client could not be constructed
    #[error("HTTP client initialization failed: {reason}")]
    ClientBuild { reason: String },

    /// Transport-level failure
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// The request exceeded the configured timeout
    #[error("LLM request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The provider returned a non-success status
    #[error("LLM API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("Invalid LLM response: {reason}")]
    InvalidResponse { reason: String },
}
