//! Loading the raw source document.
//!
//! The source is either an HTTP(S) URL or a local file path. There is no retry
//! here: a failed fetch aborts the run and callers re-run the whole pipeline.

use std::path::Path;
use std::time::Duration;

use crate::error::FetchError;

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Fetch the raw bytes of the source document.
pub fn fetch_source(source: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
    if is_url(source) {
        fetch_url(source, timeout)
    } else {
        read_file(Path::new(source))
    }
}

/// GET `url` and return the body. Non-success statuses are errors.
pub fn fetch_url(url: &str, timeout: Option<Duration>) -> Result<Vec<u8>, FetchError> {
    let http_err = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let mut builder = reqwest::blocking::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(http_err)?;

    log::debug!("fetching {url}");
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http_err)?;

    let body = response.bytes().map_err(http_err)?;
    log::debug!("fetched {} bytes from {url}", body.len());
    Ok(body.to_vec())
}

pub fn read_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })
}
