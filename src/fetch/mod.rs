//! HTTP retrieval of exported segment tables.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

/// GETs `url` and returns the body, or `None` when the server does not
/// serve it. A 404 is expected for segments without an export; any other
/// non-success status is logged as a warning.
///
/// # Errors
///
/// Transport failures (connect, timeout, body read) are errors.
pub async fn fetch_optional_bytes<C: HttpClient>(client: &C, url: &Url) -> Result<Option<Vec<u8>>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("GET {url} failed"))?;

    let status = resp.status();
    debug!(%url, %status, "Fetched");

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        warn!(%url, %status, "Server refused request");
        return Ok(None);
    }

    Ok(Some(resp.bytes().await?.to_vec()))
}
