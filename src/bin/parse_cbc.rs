use anyhow::Result;
use cbcsync::pdf::{parse_design_pdf, write_slo_csv, DesignPdf};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PDF_DIR: &str = "pdfs";
const DEFAULT_OUT: &str = "output/cbc_entries.csv";

/// Design documents to extract: (file name, subject, grade, KICD page).
// TODO: add Grade 8–12 designs and the remaining Grade 7 subjects
static DESIGNS: &[(&str, &str, u32, &str)] = &[(
    "GRADE-7-MATHEMATICS.pdf",
    "Mathematics",
    7,
    "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-seven-designs/",
)];

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let pdf_dir = env_path("CBC_PDF_DIR", DEFAULT_PDF_DIR);
    let out = env_path("CBC_PDF_OUT", DEFAULT_OUT);

    let mut rows = Vec::new();
    for &(file, subject, grade, ref_url) in DESIGNS {
        let pdf = DesignPdf {
            path: pdf_dir.join(file),
            subject: subject.to_string(),
            grade,
            ref_url: ref_url.to_string(),
        };
        rows.extend(parse_design_pdf(&pdf)?);
    }

    write_slo_csv(&out, &rows)?;
    info!("Wrote {} rows → {}", rows.len(), out.display());
    Ok(())
}
