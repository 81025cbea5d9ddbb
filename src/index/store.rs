//! Flat vector store with exact L2 search.

use std::cmp::Ordering;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::core::types::DocumentChunk;

use super::error::{IndexError, IndexResult};

/// The two parallel arrays behind the index. Always the same length.
#[derive(Debug, Default)]
pub(super) struct IndexState {
    pub(super) vectors: Vec<Vec<f32>>,
    pub(super) chunks: Vec<DocumentChunk>,
}

/// Exact k-nearest-neighbour index over L2 distance.
///
/// Reads (`search`, `save`) take a shared lock; mutations (`add`, `load`,
/// `reset`) take an exclusive one. The dimension is fixed at construction
/// and every vector is validated against it on the way in.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    pub(super) state: RwLock<IndexState>,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            state: RwLock::new(IndexState::default()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.state.read().chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append aligned chunks and vectors.
    ///
    /// An empty batch is a no-op. The whole batch is validated before any
    /// of it is stored, so a failed call leaves the index unchanged.
    pub fn add(&self, chunks: Vec<DocumentChunk>, vectors: Vec<Vec<f32>>) -> IndexResult<()> {
        if chunks.is_empty() && vectors.is_empty() {
            return Ok(());
        }
        if chunks.len() != vectors.len() {
            return Err(IndexError::AlignmentMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                });
            }
        }

        let added = chunks.len();
        let mut state = self.state.write();
        state.vectors.extend(vectors);
        state.chunks.extend(chunks);
        debug!(added, total = state.chunks.len(), "added chunks to index");
        Ok(())
    }

    /// Return the chunks of the `k` nearest vectors, closest first.
    ///
    /// Fewer than `k` results come back when the index holds fewer
    /// vectors. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<DocumentChunk>> {
        if k == 0 {
            return Err(IndexError::InvalidLimit);
        }
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let state = self.state.read();
        let mut scored: Vec<(usize, f32)> = state
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (i, squared_l2(query, vector)))
            .collect();
        // Stable sort keeps ties in insertion order.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, _)| state.chunks[i].clone())
            .collect())
    }

    /// Drop all stored chunks and vectors.
    pub fn reset(&self) {
        let mut state = self.state.write();
        *state = IndexState::default();
        info!("index reset");
    }

    /// Distinct sources with chunk counts, in first-seen order.
    pub fn sources(&self) -> Vec<(String, usize)> {
        let state = self.state.read();
        let mut sources: Vec<(String, usize)> = Vec::new();
        for chunk in &state.chunks {
            match sources
                .iter_mut()
                .find(|(name, _)| name == &chunk.metadata.source)
            {
                Some((_, count)) => *count += 1,
                None => sources.push((chunk.metadata.source.clone(), 1)),
            }
        }
        sources
    }
}

/// Squared L2 distance; the square root is monotone so ranking does not
/// need it.
pub(super) fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
