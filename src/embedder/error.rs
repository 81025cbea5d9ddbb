//! Error types for the embedding engine

use thiserror::Error;

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Errors that can occur during embedding operations
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Model file not found
    #[error("Model not found: {path}")]
    ModelNotFound { path: String },

    /// Model loading failed
    #[error("Model loading failed: {reason}")]
    ModelLoadFailed { reason: String },

    /// Tokenization failed
    #[error("Tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    /// Inference failed
    #[error("Inference failed: {reason}")]
    InferenceFailed { reason: String },

    /// ONNX runtime error
    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ort::OrtError> for EmbeddingError {
    fn from(err: ort::OrtError) -> Self {
        EmbeddingError::Onnx(err.to_string())
    }
}
