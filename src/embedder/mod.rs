//! Sentence embedding
//!
//! Local ONNX inference over a MiniLM-class sentence transformer. The
//! [`Embedder`] trait is the seam the pipeline depends on, so tests can
//! substitute a deterministic implementation.

mod config;
mod error;
mod text_embedder;


use async_trait::async_trait;

pub use config::EmbedderConfig;
pub use error::{EmbeddingError, EmbeddingResult};
pub use text_embedder::TextEmbedder;

/// Maps text to fixed-dimension vectors.
///
/// `embed_query` must apply the same model and normalization as
/// `embed_batch`, or stored and query vectors would not be comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Dimension of every vector this embedder produces.
    fn dimension(&self) -> usize;
}
