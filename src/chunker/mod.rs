//! Recursive character text chunking
//!
//! Splits extracted text into overlapping chunks suitable for embedding.
//! The splitter tries a ranked list of separators (paragraph, line,
//! sentence, word) and falls back to fixed-size character windows when a
//! span contains none of them. Adjacent chunks share a tail of up to
//! `chunk_overlap` characters so sentences near a boundary stay queryable.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::types::{ChunkMetadata, DocumentChunk};
use crate::loader::RawDocument;


/// Separators tried in order of preference.
const SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Chunker configuration errors
#[derive(Debug, Error)]
pub enum ChunkerError {
    #[error("chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})")]
    InvalidOverlap {
        chunk_size: usize,
        chunk_overlap: usize,
    },
}

/// Chunking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters carried over from the end of one chunk into the next
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Splits raw documents into overlapping text chunks.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a chunker. The overlap must be strictly smaller than the
    /// chunk size or merging could never make progress.
    pub fn new(config: ChunkerConfig) -> Result<Self, ChunkerError> {
        if config.chunk_overlap >= config.chunk_size {
            return Err(ChunkerError::InvalidOverlap {
                chunk_size: config.chunk_size,
                chunk_overlap: config.chunk_overlap,
            });
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split the documents of one source into chunks.
    ///
    /// Chunk ids are assigned per source, starting at zero and increasing
    /// in text order across all pages.
    pub fn split(&self, documents: &[RawDocument], source: &str) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        for document in documents {
            for segment in self.split_text(&document.text) {
                let mut metadata = ChunkMetadata::new(source, chunks.len());
                metadata.page = document.page;
                metadata.extra = document.extra.clone();
                chunks.push(DocumentChunk::new(segment, metadata));
            }
        }
        debug!(source, count = chunks.len(), "split source into chunks");
        chunks
    }

    /// Split a single text into chunk-sized segments.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_with(text, &SEPARATORS)
            .into_iter()
            .map(|segment| segment.trim().to_string())
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the first separator that occurs in the text; "" always does.
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() || text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let raw: Vec<String> = if separator.is_empty() {
            split_fixed(text, self.config.chunk_size, self.config.chunk_overlap)
        } else {
            text.split(separator)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect()
        };

        // Oversized pieces are split again with the finer separators before
        // merging at this level.
        let mut pieces = Vec::with_capacity(raw.len());
        for piece in raw {
            if char_len(&piece) <= self.config.chunk_size {
                pieces.push(piece);
            } else if remaining.is_empty() {
                pieces.extend(split_fixed(
                    &piece,
                    self.config.chunk_size,
                    self.config.chunk_overlap,
                ));
            } else {
                pieces.extend(self.split_with(&piece, remaining));
            }
        }

        self.merge(pieces, separator)
    }

    /// Greedily pack pieces into chunks of at most `chunk_size` characters,
    /// keeping a tail of pieces totalling at most `chunk_overlap` characters
    /// as the start of the next chunk.
    fn merge(&self, pieces: Vec<String>, separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut current: VecDeque<String> = VecDeque::new();
        // Joined length of `current`, maintained incrementally.
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);
            let added = if current.is_empty() {
                piece_len
            } else {
                piece_len + separator_len
            };

            if !current.is_empty() && total + added > self.config.chunk_size {
                chunks.push(join(&current, separator));
                while total > self.config.chunk_overlap {
                    match current.pop_front() {
                        Some(front) => {
                            total -= char_len(&front)
                                + if current.is_empty() { 0 } else { separator_len };
                        }
                        None => break,
                    }
                }
            }

            total += if current.is_empty() {
                piece_len
            } else {
                piece_len + separator_len
            };
            current.push_back(piece);
        }

        if !current.is_empty() {
            chunks.push(join(&current, separator));
        }
        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        // The default config always satisfies the overlap invariant.
        Self {
            config: ChunkerConfig::default(),
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn join(pieces: &VecDeque<String>, separator: &str) -> String {
    let mut out = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(piece);
    }
    out
}

/// Split into windows of at most `size` characters, stepping by
/// `size - overlap` so consecutive windows share an `overlap`-character
/// tail. Respects char boundaries.
fn split_fixed(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let size = size.max(1);
    let step = size.saturating_sub(overlap).max(1);

    let mut windows = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    windows
}
