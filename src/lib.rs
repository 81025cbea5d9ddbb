//! RagKit - retrieval-augmented question answering over local documents
//!
//! This crate provides the full pipeline:
//! - Document loading for text files, PDFs, spreadsheets and web pages
//! - Recursive character chunking with overlap
//! - Local ONNX sentence embeddings
//! - Exact flat L2 vector search with snapshot persistence
//! - Grounded answer synthesis through an OpenAI-compatible chat API

pub mod chunker;
pub mod core;
pub mod embedder;
pub mod index;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod synthesizer;

// Re-export commonly used items
pub use crate::core::config::{AppConfig, ConfigError, LlmSettings};
pub use crate::core::error::{RagError, Result};
pub use crate::core::types::{ChunkMetadata, DocumentChunk};
pub use chunker::{ChunkerConfig, ChunkerError, TextChunker};
pub use embedder::{Embedder, EmbedderConfig, EmbeddingError, TextEmbedder};
pub use index::{IndexError, SnapshotError, VectorIndex};
pub use loader::{LoadError, LoaderConfig, LoaderService, RawDocument};
pub use pipeline::{
    IngestReport, IngestSource, IndexStats, PipelineConfig, RagPipeline, SourceOutcome,
};
pub use synthesizer::{AnswerSynthesizer, ChatSynthesizer, GenerationError, LlmConfig};
