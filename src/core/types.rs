//! Core data types shared across the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provenance information attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Origin of the chunk, a file name or URL.
    pub source: String,
    /// Position of the chunk within its source, starting at zero.
    pub chunk_id: usize,
    /// Page number for paginated sources, 1-based.
    #[serde(default)]
    pub page: Option<u32>,
    /// Extra provenance fields such as sheet names or page titles.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ChunkMetadata {
    pub fn new(source: impl Into<String>, chunk_id: usize) -> Self {
        Self {
            source: source.into(),
            chunk_id,
            page: None,
            extra: BTreeMap::new(),
        }
    }
}

/// A contiguous span of extracted text together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}
