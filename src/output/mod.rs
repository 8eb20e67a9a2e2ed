// src/output/mod.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::{Builder, NamedTempFile};
use tracing::info;

use crate::process::{render_table, OutputDocument};

pub const ENTRIES_FILE: &str = "entries.json";
pub const VERSION_FILE: &str = "version.txt";

/// Where a run's two artifacts ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub entries: PathBuf,
    pub version: PathBuf,
}

/// Write `contents` to a hidden temp file inside `dir`.
fn stage(dir: &Path, name: &str, contents: &[u8]) -> Result<NamedTempFile> {
    let mut tmp = Builder::new()
        .prefix(&format!(".{}.", name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("creating temp file for {} in {:?}", name, dir))?;
    tmp.write_all(contents)
        .with_context(|| format!("writing {}", name))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("flushing {}", name))?;
    Ok(tmp)
}

/// Write `entries.json` and `version.txt` for `doc` into `dir`.
///
/// Both files are fully staged next to their targets before either is
/// renamed into place, entries first. The directory is created if absent;
/// previous artifacts are replaced, never merged.
#[tracing::instrument(
    level = "info",
    skip(dir, doc),
    fields(out_dir = %dir.as_ref().display(), count = doc.meta.count)
)]
pub fn write_artifacts(dir: impl AsRef<Path>, doc: &OutputDocument) -> Result<ArtifactPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;

    // 2-space indent, no trailing newline
    let json = serde_json::to_vec_pretty(doc).context("serializing entries document")?;
    let version = format!("{}\n", doc.meta.generated_at);

    let entries_tmp = stage(dir, ENTRIES_FILE, &json)?;
    let version_tmp = stage(dir, VERSION_FILE, version.as_bytes())?;

    let paths = ArtifactPaths {
        entries: dir.join(ENTRIES_FILE),
        version: dir.join(VERSION_FILE),
    };
    entries_tmp
        .persist(&paths.entries)
        .with_context(|| format!("renaming into {:?}", paths.entries))?;
    version_tmp
        .persist(&paths.version)
        .with_context(|| format!("renaming into {:?}", paths.version))?;

    info!(
        entries = %paths.entries.display(),
        version = %paths.version.display(),
        bytes = json.len(),
        "wrote artifacts"
    );
    Ok(paths)
}

/// Write a header + rows CSV file to `path`, creating parent directories.
pub fn write_csv<I, R, S>(path: impl AsRef<Path>, headers: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    fs::write(path, render_table(headers, rows)).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}
