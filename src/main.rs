use anyhow::Result;
use cbcsync::{pipeline, Config};
use reqwest::Client;
use std::env;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Ok(level) = env::var("LOG_LEVEL") {
        filter = filter.add_directive(level.parse().unwrap_or(Level::INFO.into()));
    }
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {:#}", e);
            return Err(e);
        }
    };

    // ─── 3) fetch → parse → normalize → write ────────────────────────
    let client = Client::new();
    match pipeline::run(&config, &client).await {
        Ok(summary) => {
            info!(
                "Wrote {} ({} entries)",
                summary.paths.entries.display(),
                summary.entries
            );
            Ok(())
        }
        Err(e) => {
            error!("sync failed: {:#}", e);
            Err(e)
        }
    }
}
