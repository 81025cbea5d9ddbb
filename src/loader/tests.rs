//! Loader tests

use std::io::Write;

use super::*;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content).unwrap();
    path
}

fn service() -> LoaderService {
    LoaderService::new(LoaderConfig::default()).unwrap()
}

#[tokio::test]
async fn test_load_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "notes.txt", b"some plain text notes");

    let documents = service().load_path(&path).await.unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text, "some plain text notes");
    assert_eq!(documents[0].page, None);
}

#[tokio::test]
async fn test_load_empty_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "empty.txt", b"   \n  ");

    let documents = service().load_path(&path).await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "NOTES.TXT", b"shouting notes");

    let documents = service().load_path(&path).await.unwrap();
    assert_eq!(documents.len(), 1);
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "image.png", b"not text");

    let error = service().load_path(&path).await.unwrap_err();
    assert!(matches!(
        error,
        LoadError::UnsupportedFormat { extension } if extension == "png"
    ));
}

#[tokio::test]
async fn test_missing_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "README", b"no extension");

    let error = service().load_path(&path).await.unwrap_err();
    assert!(matches!(error, LoadError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let error = service().load_path(&path).await.unwrap_err();
    assert!(matches!(error, LoadError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_garbage_pdf_is_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "broken.pdf", b"this is not a pdf at all");

    let error = service().load_path(&path).await.unwrap_err();
    assert!(matches!(error, LoadError::Extraction { .. }));
}

#[tokio::test]
async fn test_garbage_spreadsheet_is_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "broken.xlsx", b"this is not a workbook");

    let error = service().load_path(&path).await.unwrap_err();
    assert!(matches!(error, LoadError::Extraction { .. }));
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let error = service().load_url("not a url").await.unwrap_err();
    assert!(matches!(error, LoadError::InvalidUrl { .. }));
}
