//! Plain text file loading.

use std::path::Path;

use super::{LoadResult, RawDocument};

pub(super) async fn load(path: &Path) -> LoadResult<Vec<RawDocument>> {
    let text = tokio::fs::read_to_string(path).await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![RawDocument::new(text)])
}
