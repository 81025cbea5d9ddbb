//! Index error types.

use thiserror::Error;

/// Errors from index mutations and queries.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Chunk/vector misalignment: {chunks} chunks but {vectors} vectors")]
    AlignmentMismatch { chunks: usize, vectors: usize },

    #[error("Search limit must be at least 1")]
    InvalidLimit,
}

/// Index result type
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors from writing or reading snapshot files.
///
/// `load` reports failure as a boolean and keeps the in-memory state
/// untouched; these variants surface through `save` and in logs.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot {name:?} not found in {directory}")]
    NotFound { directory: String, name: String },

    #[error("Snapshot encoding failed: {reason}")]
    Encode { reason: String },

    #[error("Snapshot is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
