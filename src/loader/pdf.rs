//! PDF text extraction.
//!
//! `pdf_extract` emits a form feed between pages, which is used here to
//! recover per-page documents. Extraction is CPU-bound and runs on the
//! blocking pool.

use std::path::Path;

use super::{LoadError, LoadResult, RawDocument};

pub(super) async fn load(path: &Path) -> LoadResult<Vec<RawDocument>> {
    let bytes = tokio::fs::read(path).await?;
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| LoadError::Extraction {
            reason: format!("extraction task failed: {e}"),
        })?
        .map_err(|e| LoadError::Extraction {
            reason: e.to_string(),
        })?;

    let documents = text
        .split('\x0C')
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| {
            let mut document = RawDocument::new(page.trim().to_string());
            document.page = Some(i as u32 + 1);
            document
        })
        .collect();
    Ok(documents)
}
