//! Web page fetching and readable-text extraction.
//!
//! Fetches the page with the shared HTTP client and runs it through the
//! readability extractor to strip navigation and boilerplate.

use std::io::Cursor;

use tracing::debug;
use url::Url;

use super::{LoadError, LoadResult, RawDocument};

pub(super) async fn load(
    client: &reqwest::Client,
    url: &str,
    timeout_ms: u64,
) -> LoadResult<Vec<RawDocument>> {
    let parsed = Url::parse(url).map_err(|e| LoadError::InvalidUrl {
        reason: e.to_string(),
    })?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| classify(e, timeout_ms))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Fetch {
            reason: format!("HTTP {status}"),
        });
    }

    // Redirects may have moved us; readability resolves relative links
    // against the final URL.
    let final_url = response.url().clone();
    let body = response.bytes().await.map_err(|e| classify(e, timeout_ms))?;

    let product = {
        let mut cursor = Cursor::new(body.as_ref());
        readability::extractor::extract(&mut cursor, &final_url).map_err(|e| {
            LoadError::Extraction {
                reason: e.to_string(),
            }
        })?
    };
    debug!(url = %final_url, title = %product.title, "extracted web page");

    if product.text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut document = RawDocument::new(product.text);
    if !product.title.is_empty() {
        document
            .extra
            .insert("title".to_string(), product.title);
    }
    Ok(vec![document])
}

fn classify(error: reqwest::Error, timeout_ms: u64) -> LoadError {
    if error.is_timeout() {
        LoadError::Timeout { timeout_ms }
    } else {
        LoadError::Fetch {
            reason: error.to_string(),
        }
    }
}
