//! Snapshot persistence for the vector index.
//!
//! A snapshot is two bincode files in one directory: `{name}.index` with
//! the vectors and `{name}.chunks` with the chunk collection. Loading
//! validates both files and their mutual alignment before swapping the
//! decoded state in; any failure leaves the current state untouched.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::types::DocumentChunk;

use super::error::SnapshotError;
use super::store::{IndexState, VectorIndex};

pub(super) fn index_file(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}.index"))
}

pub(super) fn chunks_file(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}.chunks"))
}

#[derive(Serialize)]
struct IndexArtifactRef<'a> {
    dimension: usize,
    vectors: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct IndexArtifact {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Write the current contents as a named snapshot.
    ///
    /// Both files are written even when the index is empty, so an empty
    /// snapshot loads back as an empty index.
    pub fn save(&self, directory: &Path, name: &str) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(directory)?;
        let state = self.state.read();

        let artifact = IndexArtifactRef {
            dimension: self.dimension(),
            vectors: &state.vectors,
        };
        let writer = BufWriter::new(File::create(index_file(directory, name))?);
        bincode::serialize_into(writer, &artifact).map_err(|e| SnapshotError::Encode {
            reason: e.to_string(),
        })?;

        let writer = BufWriter::new(File::create(chunks_file(directory, name))?);
        bincode::serialize_into(writer, &state.chunks).map_err(|e| SnapshotError::Encode {
            reason: e.to_string(),
        })?;

        info!(
            directory = %directory.display(),
            name,
            chunks = state.chunks.len(),
            "saved index snapshot"
        );
        Ok(())
    }

    /// Restore a named snapshot, replacing the current contents.
    ///
    /// Returns `true` on success. A missing or unreadable snapshot returns
    /// `false` and leaves the index exactly as it was.
    pub fn load(&self, directory: &Path, name: &str) -> bool {
        match self.try_load(directory, name) {
            Ok(count) => {
                info!(directory = %directory.display(), name, chunks = count, "loaded index snapshot");
                true
            }
            Err(SnapshotError::NotFound { .. }) => {
                debug!(directory = %directory.display(), name, "no snapshot to load");
                false
            }
            Err(e) => {
                warn!(directory = %directory.display(), name, error = %e, "snapshot load failed");
                false
            }
        }
    }

    fn try_load(&self, directory: &Path, name: &str) -> Result<usize, SnapshotError> {
        let index_path = index_file(directory, name);
        let chunks_path = chunks_file(directory, name);
        if !index_path.exists() || !chunks_path.exists() {
            return Err(SnapshotError::NotFound {
                directory: directory.display().to_string(),
                name: name.to_string(),
            });
        }

        let reader = BufReader::new(File::open(&index_path)?);
        let artifact: IndexArtifact =
            bincode::deserialize_from(reader).map_err(|e| SnapshotError::Corrupt {
                reason: format!("{}: {e}", index_path.display()),
            })?;

        let reader = BufReader::new(File::open(&chunks_path)?);
        let chunks: Vec<DocumentChunk> =
            bincode::deserialize_from(reader).map_err(|e| SnapshotError::Corrupt {
                reason: format!("{}: {e}", chunks_path.display()),
            })?;

        if artifact.dimension != self.dimension() {
            return Err(SnapshotError::Corrupt {
                reason: format!(
                    "snapshot dimension {} does not match index dimension {}",
                    artifact.dimension,
                    self.dimension()
                ),
            });
        }
        if artifact.vectors.len() != chunks.len() {
            return Err(SnapshotError::Corrupt {
                reason: format!(
                    "{} vectors but {} chunks",
                    artifact.vectors.len(),
                    chunks.len()
                ),
            });
        }
        if let Some(bad) = artifact
            .vectors
            .iter()
            .find(|v| v.len() != self.dimension())
        {
            return Err(SnapshotError::Corrupt {
                reason: format!(
                    "stored vector has dimension {}, expected {}",
                    bad.len(),
                    self.dimension()
                ),
            });
        }

        let count = chunks.len();
        let mut state = self.state.write();
        *state = IndexState {
            vectors: artifact.vectors,
            chunks,
        };
        Ok(count)
    }

    /// Delete the files of a named snapshot if they exist.
    pub fn remove_snapshot(directory: &Path, name: &str) -> Result<(), SnapshotError> {
        for path in [index_file(directory, name), chunks_file(directory, name)] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
