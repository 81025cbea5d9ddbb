//! Spreadsheet text extraction.
//!
//! Each non-empty sheet becomes one document: rows joined by newlines,
//! cells by tabs, with the sheet name recorded in the metadata.

use std::path::Path;

use calamine::{open_workbook_auto, Reader};

use super::{LoadError, LoadResult, RawDocument};

pub(super) async fn load(path: &Path) -> LoadResult<Vec<RawDocument>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_workbook(&path))
        .await
        .map_err(|e| LoadError::Extraction {
            reason: format!("extraction task failed: {e}"),
        })?
}

fn read_workbook(path: &Path) -> LoadResult<Vec<RawDocument>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Extraction {
        reason: e.to_string(),
    })?;

    let sheets = workbook.sheet_names().to_vec();
    let mut documents = Vec::new();
    for sheet in sheets {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::Extraction {
                reason: format!("sheet {sheet}: {e}"),
            })?;
        if range.is_empty() {
            continue;
        }

        let text = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            continue;
        }

        let mut document = RawDocument::new(text);
        document.extra.insert("sheet".to_string(), sheet);
        documents.push(document);
    }
    Ok(documents)
}
