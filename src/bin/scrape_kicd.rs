use anyhow::{Context, Result};
use cbcsync::scrape::{scrape_all, write_seed_csv, GRADE_PAGES};
use reqwest::Client;
use std::{env, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SEED_OUT: &str = "output/cbc_seed.csv";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let out = env::var("CBC_SEED_OUT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_OUT));

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")?;

    let rows = scrape_all(&client, GRADE_PAGES).await;
    write_seed_csv(&out, &rows)?;

    info!("Saved {} seed rows → {}", rows.len(), out.display());
    Ok(())
}
