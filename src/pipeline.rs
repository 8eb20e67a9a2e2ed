// src/pipeline.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use crate::{
    config::Config,
    fetch::fetch_csv,
    output::{write_artifacts, ArtifactPaths},
    process,
};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub generated_at: String,
    pub paths: ArtifactPaths,
}

/// Fetch, parse, normalize and write, one step after the other.
///
/// Any failure aborts the run; nothing is retried.
#[tracing::instrument(level = "info", skip_all, fields(url = %config.sheet_url))]
pub async fn run(config: &Config, client: &Client) -> Result<RunSummary> {
    let csv = fetch_csv(client, &config.sheet_url)
        .await
        .context("fetching source CSV")?;

    let rows = process::parse(&csv);
    info!(
        rows = rows.len(),
        columns = rows.first().map(|r| r.headers().len()).unwrap_or(0),
        "parsed csv"
    );

    let doc = process::normalize(&rows, &config.source_label);
    info!(entries = doc.meta.count, generated_at = %doc.meta.generated_at, "normalized");

    let paths = write_artifacts(&config.output_dir, &doc).context("writing artifacts")?;

    Ok(RunSummary {
        entries: doc.entries.len(),
        generated_at: doc.meta.generated_at,
        paths,
    })
}
