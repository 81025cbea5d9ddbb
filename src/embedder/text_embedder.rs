//! ONNX sentence embedder.
//!
//! Runs a sentence-transformer model through the ONNX runtime, mean-pools
//! the token embeddings under the attention mask and L2-normalizes the
//! result. Inference is CPU-bound and runs on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use ndarray::{Array2, ArrayViewD, CowArray, Ix2, Ix3};
use ort::{Environment, ExecutionProvider, GraphOptimizationLevel, Session, SessionBuilder, Value};
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::config::EmbedderConfig;
use super::error::{EmbeddingError, EmbeddingResult};
use super::Embedder;

/// Sentence embedder backed by a local ONNX model.
pub struct TextEmbedder {
    session: Arc<Session>,
    tokenizer: Arc<Tokenizer>,
    config: EmbedderConfig,
}

impl TextEmbedder {
    /// Load the model and tokenizer from the configured paths.
    pub fn load(config: EmbedderConfig) -> EmbeddingResult<Self> {
        if !config.model_file.exists() {
            return Err(EmbeddingError::ModelNotFound {
                path: config.model_file.to_string_lossy().to_string(),
            });
        }

        let environment = Environment::builder()
            .with_name("ragkit")
            .with_execution_providers([ExecutionProvider::CPU(Default::default())])
            .build()?
            .into_arc();
        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.intra_threads)?
            .with_model_from_file(&config.model_file)?;

        let mut tokenizer =
            Tokenizer::from_file(&config.tokenizer_file).map_err(|e| {
                EmbeddingError::ModelLoadFailed {
                    reason: format!("tokenizer: {e}"),
                }
            })?;
        tokenizer.with_padding(Some(PaddingParams::default()));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_length,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("tokenizer truncation: {e}"),
            })?;

        info!(model = %config.model_file.display(), dim = config.embedding_dim, "loaded embedding model");
        Ok(Self {
            session: Arc::new(session),
            tokenizer: Arc::new(tokenizer),
            config,
        })
    }
}

#[async_trait]
impl Embedder for TextEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);

        // Run inference in a blocking task to avoid stalling the runtime
        let embeddings =
            tokio::task::spawn_blocking(move || run_inference_sync(&session, &tokenizer, owned))
                .await
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("inference task failed: {e}"),
                })??;
        debug!(count = embeddings.len(), "embedded batch");
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "model returned no embedding".to_string(),
            })
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }
}

fn run_inference_sync(
    session: &Session,
    tokenizer: &Tokenizer,
    texts: Vec<String>,
) -> EmbeddingResult<Vec<Vec<f32>>> {
    let encodings =
        tokenizer
            .encode_batch(texts, true)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            })?;

    let batch_size = encodings.len();
    // Padding makes all sequences in the batch the same length.
    let seq_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut input_ids = Array2::<i64>::zeros((batch_size, seq_len));
    let mut attention = Array2::<i64>::zeros((batch_size, seq_len));
    let mut type_ids = Array2::<i64>::zeros((batch_size, seq_len));
    let mut masks: Vec<Vec<i64>> = Vec::with_capacity(batch_size);
    for (i, encoding) in encodings.iter().enumerate() {
        for (j, &id) in encoding.get_ids().iter().enumerate() {
            input_ids[[i, j]] = id as i64;
        }
        for (j, &mask) in encoding.get_attention_mask().iter().enumerate() {
            attention[[i, j]] = mask as i64;
        }
        for (j, &type_id) in encoding.get_type_ids().iter().enumerate() {
            type_ids[[i, j]] = type_id as i64;
        }
        masks.push(
            encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
        );
    }

    let input_ids = CowArray::from(input_ids.into_dyn());
    let attention_cow = CowArray::from(attention.into_dyn());
    let type_ids = CowArray::from(type_ids.into_dyn());
    let inputs = vec![
        Value::from_array(session.allocator(), &input_ids)?,
        Value::from_array(session.allocator(), &attention_cow)?,
        Value::from_array(session.allocator(), &type_ids)?,
    ];

    let outputs = session.run(inputs)?;
    let output = outputs
        .first()
        .ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "model produced no outputs".to_string(),
        })?;
    let tensor = output.try_extract::<f32>()?;
    let view = tensor.view();
    pool_output(&view, &masks)
}

/// Reduce the model output to one vector per input.
///
/// Sentence transformers emit `[batch, seq, hidden]` token embeddings;
/// some exported models already pool to `[batch, hidden]`.
pub(super) fn pool_output(
    tensor: &ArrayViewD<f32>,
    masks: &[Vec<i64>],
) -> EmbeddingResult<Vec<Vec<f32>>> {
    match tensor.ndim() {
        3 => mean_pool(tensor, masks),
        2 => {
            let view =
                tensor
                    .view()
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| EmbeddingError::InferenceFailed {
                        reason: e.to_string(),
                    })?;
            Ok(view
                .outer_iter()
                .map(|row| {
                    let mut vector = row.to_vec();
                    l2_normalize(&mut vector);
                    vector
                })
                .collect())
        }
        other => Err(EmbeddingError::InferenceFailed {
            reason: format!("unexpected output rank {other}"),
        }),
    }
}

/// Mean-pool token embeddings over the attention mask, then normalize.
pub(super) fn mean_pool(
    tensor: &ArrayViewD<f32>,
    masks: &[Vec<i64>],
) -> EmbeddingResult<Vec<Vec<f32>>> {
    let view = tensor
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|e| EmbeddingError::InferenceFailed {
            reason: e.to_string(),
        })?;
    let (batch_size, seq_len, hidden) = view.dim();

    let mut embeddings = Vec::with_capacity(batch_size);
    for i in 0..batch_size {
        let mut pooled = vec![0.0f32; hidden];
        let mut count = 0.0f32;
        for j in 0..seq_len {
            let attended = masks
                .get(i)
                .and_then(|mask| mask.get(j))
                .copied()
                .unwrap_or(0);
            if attended == 1 {
                count += 1.0;
                for (k, value) in pooled.iter_mut().enumerate() {
                    *value += view[[i, j, k]];
                }
            }
        }
        if count > 0.0 {
            for value in &mut pooled {
                *value /= count;
            }
        }
        l2_normalize(&mut pooled);
        embeddings.push(pooled);
    }
    Ok(embeddings)
}

/// Scale a vector to unit L2 norm. Zero vectors stay zero.
pub(super) fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
