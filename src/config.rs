// src/config.rs

use anyhow::{anyhow, Context, Result};
use std::{env, path::PathBuf};
use url::Url;

use crate::process::normalize::DEFAULT_SOURCE;

pub const SHEET_URL_VAR: &str = "CBC_SHEET_URL";
pub const OUTPUT_DIR_VAR: &str = "CBC_OUTPUT_DIR";
pub const SOURCE_LABEL_VAR: &str = "CBC_SOURCE_LABEL";

pub const DEFAULT_OUTPUT_DIR: &str = "docs";

/// Everything a sync run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the published CSV lives.
    pub sheet_url: Url,
    /// Directory receiving `entries.json` and `version.txt`.
    pub output_dir: PathBuf,
    /// Written verbatim to `meta.source`.
    pub source_label: String,
}

impl Config {
    pub fn new(sheet_url: Url, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sheet_url,
            output_dir: output_dir.into(),
            source_label: DEFAULT_SOURCE.to_string(),
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(SHEET_URL_VAR).ok_or_else(|| anyhow!("Missing {} env", SHEET_URL_VAR))?;
        let sheet_url = Url::parse(raw_url.trim())
            .with_context(|| format!("{} is not a valid URL: {}", SHEET_URL_VAR, raw_url))?;

        let output_dir = get(OUTPUT_DIR_VAR).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
        let source_label = get(SOURCE_LABEL_VAR).unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        Ok(Self {
            sheet_url,
            output_dir: PathBuf::from(output_dir),
            source_label,
        })
    }
}
