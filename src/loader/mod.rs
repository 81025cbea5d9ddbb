//! Document loading and text extraction
//!
//! Turns local files and web pages into plain text ready for chunking.
//! Formats are dispatched on the lowercased file extension; anything
//! outside the supported set is rejected before touching the filesystem.

mod pdf;
mod spreadsheet;
mod text;
mod web;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Loading error types
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Content extraction failed: {reason}")]
    Extraction { reason: String },

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Fetch failed: {reason}")]
    Fetch { reason: String },

    #[error("Fetch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP client initialization failed: {reason}")]
    Client { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loading result type
pub type LoadResult<T> = Result<T, LoadError>;

/// Extracted text before chunking, one per logical unit of a source
/// (a whole text file, a PDF page, a spreadsheet sheet, a web page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub text: String,
    /// Page number for paginated sources, 1-based.
    pub page: Option<u32>,
    /// Extra provenance such as sheet names or page titles.
    pub extra: BTreeMap<String, String>,
}

impl RawDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Timeout for URL fetches in milliseconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    20_000
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout(),
        }
    }
}

/// Loads files and URLs into [`RawDocument`]s.
pub struct LoaderService {
    config: LoaderConfig,
    client: reqwest::Client,
}

impl LoaderService {
    pub fn new(config: LoaderConfig) -> LoadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()
            .map_err(|e| LoadError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self { config, client })
    }

    /// Load a local file, dispatching on its extension.
    ///
    /// Supported: `.txt`, `.pdf`, `.xlsx`, `.xls`. The extension check is
    /// case-insensitive.
    pub async fn load_path(&self, path: &Path) -> LoadResult<Vec<RawDocument>> {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "pdf" | "xlsx" | "xls" => {}
            _ => return Err(LoadError::UnsupportedFormat { extension }),
        }
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!(path = %path.display(), %extension, "loading file");
        match extension.as_str() {
            "txt" => text::load(path).await,
            "pdf" => pdf::load(path).await,
            _ => spreadsheet::load(path).await,
        }
    }

    /// Fetch a web page and extract its readable text.
    pub async fn load_url(&self, url: &str) -> LoadResult<Vec<RawDocument>> {
        web::load(&self.client, url, self.config.fetch_timeout_ms).await
    }
}
