// src/fetch/mod.rs

use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use tracing::info;
use url::Url;

/// GET the CSV document at `url` and return its body as text.
///
/// Caches are bypassed. There is no timeout and no retry; any non-2xx
/// status is an error carrying the status code.
#[tracing::instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_csv(client: &Client, url: &Url) -> Result<String> {
    let resp = client
        .get(url.as_str())
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await
        .with_context(|| format!("GET {}", url))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("Fetch failed {}", status.as_u16()));
    }

    let text = resp
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    info!(status = status.as_u16(), bytes = text.len(), "fetched csv");
    Ok(text)
}
