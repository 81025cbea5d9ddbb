//! Top-level error type for RagKit.
//!
//! Each module carries its own error enum; this type gathers them so that
//! pipeline-level operations can return a single error.

use thiserror::Error;

use crate::chunker::ChunkerError;
use crate::core::config::ConfigError;
use crate::embedder::EmbeddingError;
use crate::index::{IndexError, SnapshotError};
use crate::loader::LoadError;
use crate::synthesizer::GenerationError;

/// Result type alias for RagKit operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Main error type for RagKit
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Chunker error: {0}")]
    Chunker(#[from] ChunkerError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
