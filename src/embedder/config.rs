//! Embedding engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the ONNX sentence embedder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    /// Path to the ONNX model file
    #[serde(default = "default_model_file")]
    pub model_file: PathBuf,

    /// Path to the tokenizer definition
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: PathBuf,

    /// Maximum token sequence length; longer inputs are truncated
    #[serde(default = "default_max_seq_length")]
    pub max_seq_length: usize,

    /// Output embedding dimension
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Threads used inside a single inference call
    #[serde(default = "default_intra_threads")]
    pub intra_threads: i16,
}

fn default_model_file() -> PathBuf {
    PathBuf::from("models/all-MiniLM-L6-v2.onnx")
}

fn default_tokenizer_file() -> PathBuf {
    PathBuf::from("models/tokenizer.json")
}

fn default_max_seq_length() -> usize {
    256
}

fn default_embedding_dim() -> usize {
    384
}

fn default_intra_threads() -> i16 {
    4
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_file: default_model_file(),
            tokenizer_file: default_tokenizer_file(),
            max_seq_length: default_max_seq_length(),
            embedding_dim: default_embedding_dim(),
            intra_threads: default_intra_threads(),
        }
    }
}
