//! Pipeline orchestration
//!
//! Wires loading, chunking, embedding, indexing and synthesis together.
//! Ingestion isolates per-source failures so one bad file cannot sink a
//! batch, persists a snapshot after any successful addition, and the
//! query path short-circuits with fixed messages when there is nothing
//! to retrieve from.


use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::chunker::TextChunker;
use crate::core::error::{RagError, Result};
use crate::core::types::DocumentChunk;
use crate::embedder::{Embedder, EmbeddingError};
use crate::index::VectorIndex;
use crate::loader::{LoadError, LoaderService};
use crate::synthesizer::AnswerSynthesizer;

/// Returned when a question arrives before any document was ingested.
pub const NOT_INITIALIZED_MESSAGE: &str =
    "The knowledge base is empty. Add documents or URLs before asking questions.";

/// Returned when retrieval produces no context for a question.
pub const NOTHING_RELEVANT_MESSAGE: &str =
    "I could not find relevant information in the indexed documents. Try rephrasing \
the question or adding more sources.";

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding index snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base name of the snapshot file pair
    #[serde(default = "default_snapshot_name")]
    pub snapshot_name: String,

    /// Number of chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_snapshot_name() -> String {
    "vector_store".to_string()
}

fn default_top_k() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_name: default_snapshot_name(),
            top_k: default_top_k(),
        }
    }
}

/// Something to ingest: a local file or a web page.
#[derive(Debug, Clone)]
pub enum IngestSource {
    File(PathBuf),
    Url(String),
}

impl IngestSource {
    /// Label recorded as chunk provenance: the file name for files, the
    /// full URL for pages.
    pub fn label(&self) -> String {
        match self {
            IngestSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            IngestSource::Url(url) => url.clone(),
        }
    }
}

/// A failure confined to a single source during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

/// What happened to one source during an ingest call.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: String,
    /// Number of chunks added, or why the source was skipped.
    pub result: std::result::Result<usize, IngestError>,
}

/// Per-source results of one ingest call.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl IngestReport {
    /// Total chunks added across all sources.
    pub fn chunks_added(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.result.is_err())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
    }
}

/// Index contents summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub chunk_count: usize,
    /// Distinct sources with chunk counts, in ingestion order.
    pub sources: Vec<(String, usize)>,
}

/// The assembled question-answering pipeline.
pub struct RagPipeline {
    config: PipelineConfig,
    loader: LoaderService,
    chunker: TextChunker,
    embedder: Arc<dyn Embedder>,
    index: VectorIndex,
    synthesizer: Arc<dyn AnswerSynthesizer>,
}

impl RagPipeline {
    /// Assemble the pipeline and restore the snapshot if one exists.
    ///
    /// The index dimension always comes from the embedder, so stored and
    /// query vectors cannot disagree by construction.
    pub fn new(
        config: PipelineConfig,
        loader: LoaderService,
        chunker: TextChunker,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
    ) -> Self {
        let index = VectorIndex::new(embedder.dimension());
        if !index.load(&config.data_dir, &config.snapshot_name) {
            info!("starting with an empty index");
        }
        Self {
            config,
            loader,
            chunker,
            embedder,
            index,
            synthesizer,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Ingest a batch of sources.
    ///
    /// Load and embedding failures are recorded per source and do not
    /// stop the batch. Index rejections and snapshot write failures are
    /// pipeline-level errors and abort. The snapshot is rewritten once
    /// per call, after all sources were processed, and only when at
    /// least one chunk was added.
    pub async fn ingest(&self, sources: &[IngestSource]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        for source in sources {
            let label = source.label();
            let result = self.ingest_one(source, &label).await?;
            if let Err(error) = &result {
                warn!(source = %label, %error, "source skipped");
            }
            report.outcomes.push(SourceOutcome {
                source: label,
                result,
            });
        }

        if report.chunks_added() > 0 {
            self.index
                .save(&self.config.data_dir, &self.config.snapshot_name)?;
        }
        info!(
            sources = sources.len(),
            added = report.chunks_added(),
            failures = report.failures().count(),
            "ingest finished"
        );
        Ok(report)
    }

    async fn ingest_one(
        &self,
        source: &IngestSource,
        label: &str,
    ) -> Result<std::result::Result<usize, IngestError>> {
        let documents = match source {
            IngestSource::File(path) => self.loader.load_path(path).await,
            IngestSource::Url(url) => self.loader.load_url(url).await,
        };
        let documents = match documents {
            Ok(documents) => documents,
            Err(error) => return Ok(Err(error.into())),
        };

        let chunks = self.chunker.split(&documents, label);
        if chunks.is_empty() {
            return Ok(Ok(0));
        }

        let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
        let vectors = match self.embedder.embed_batch(&texts).await {
            Ok(vectors) => vectors,
            Err(error) => return Ok(Err(error.into())),
        };

        let added = chunks.len();
        self.index.add(chunks, vectors)?;
        Ok(Ok(added))
    }

    /// Answer a question from the indexed documents.
    pub async fn answer(&self, query: &str) -> Result<String> {
        if self.index.is_empty() {
            return Ok(NOT_INITIALIZED_MESSAGE.to_string());
        }

        let query_vector = self.embedder.embed_query(query).await?;
        let hits = self.index.search(&query_vector, self.config.top_k)?;
        self.answer_from_hits(query, hits).await
    }

    pub(crate) async fn answer_from_hits(
        &self,
        query: &str,
        hits: Vec<DocumentChunk>,
    ) -> Result<String> {
        if hits.is_empty() {
            return Ok(NOTHING_RELEVANT_MESSAGE.to_string());
        }
        let answer = self
            .synthesizer
            .answer(query, &hits)
            .await
            .map_err(RagError::Generation)?;
        Ok(answer)
    }

    /// Drop the index contents and delete the snapshot files.
    ///
    /// The files go first: if removal fails the in-memory index is left
    /// intact, so memory and disk cannot disagree about what exists.
    pub fn reset(&self) -> Result<()> {
        VectorIndex::remove_snapshot(&self.config.data_dir, &self.config.snapshot_name)?;
        self.index.reset();
        Ok(())
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            chunk_count: self.index.len(),
            sources: self.index.sources(),
        }
    }
}
