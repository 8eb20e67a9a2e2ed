// src/pdf/mod.rs

use anyhow::{Context, Result};
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::{output::write_csv, process::render_table};

/// Column layout of the SLO extract.
pub const SLO_HEADERS: &[&str] = &[
    "RowId",
    "CBC_Level",
    "Grade",
    "Subject",
    "Strand",
    "Substrand",
    "SLO",
    "KICD_RefURL",
];

const JUNIOR_SCHOOL_MAX_GRADE: u32 = 9;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
// numbered outcome, e.g. "1. Solve linear equations"
static SLO_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. ").expect("SLO regex"));

/// A curriculum-design PDF and what it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignPdf {
    pub path: PathBuf,
    pub subject: String,
    pub grade: u32,
    pub ref_url: String,
}

/// One specific learning outcome found in a design document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SloRow {
    pub row_id: String,
    pub cbc_level: String,
    pub grade: u32,
    pub subject: String,
    pub strand: String,
    pub substrand: String,
    pub slo: String,
    pub ref_url: String,
}

impl SloRow {
    /// Cell values in [`SLO_HEADERS`] order.
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.row_id.clone(),
            self.cbc_level.clone(),
            self.grade.to_string(),
            self.subject.clone(),
            self.strand.clone(),
            self.substrand.clone(),
            self.slo.clone(),
            self.ref_url.clone(),
        ]
    }
}

/// Trim and collapse runs of whitespace to a single space.
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// `MATH-G7-003`: first four letters of the subject, upper-cased.
fn row_id(subject: &str, grade: u32, n: usize) -> String {
    let prefix: String = subject.chars().take(4).collect();
    format!("{}-G{}-{:03}", prefix.to_uppercase(), grade, n)
}

/// Scan one page of text, appending outcomes to `rows`.
///
/// Strand and sub-strand headings apply to the outcomes that follow them
/// on the same page. Numbering continues from `rows.len()`.
fn scan_page(text: &str, subject: &str, grade: u32, ref_url: &str, rows: &mut Vec<SloRow>) {
    let mut strand = String::new();
    let mut substrand = String::new();

    for raw in text.lines() {
        let line = clean_text(raw);
        let lower = line.to_lowercase();

        if lower.starts_with("strand") {
            strand = line;
        } else if lower.starts_with("sub-strand") {
            substrand = line;
        } else if SLO_LINE.is_match(&line) {
            rows.push(SloRow {
                row_id: row_id(subject, grade, rows.len() + 1),
                cbc_level: if grade <= JUNIOR_SCHOOL_MAX_GRADE {
                    "Junior School"
                } else {
                    "Senior School"
                }
                .to_string(),
                grade,
                subject: subject.to_string(),
                strand: strand.clone(),
                substrand: substrand.clone(),
                slo: line,
                ref_url: ref_url.to_string(),
            });
        }
    }
}

/// Pull numbered learning outcomes out of extracted page text.
pub fn extract_slo_rows(text: &str, subject: &str, grade: u32, ref_url: &str) -> Vec<SloRow> {
    let mut rows = Vec::new();
    scan_page(text, subject, grade, ref_url, &mut rows);
    rows
}

/// Extract the text of every page, in page order. Unreadable pages are skipped.
pub fn load_page_texts(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let document =
        Document::load(path).with_context(|| format!("loading PDF {}", path.display()))?;

    let mut pages = Vec::new();
    for (page_num, _) in document.get_pages() {
        match document.extract_text(&[page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!(page = page_num, "no text extracted: {}", e),
        }
    }
    debug!(path = %path.display(), pages = pages.len(), "loaded PDF text");
    Ok(pages)
}

/// All outcomes of one design PDF, numbered across pages.
#[tracing::instrument(level = "info", skip(pdf), fields(path = %pdf.path.display()))]
pub fn parse_design_pdf(pdf: &DesignPdf) -> Result<Vec<SloRow>> {
    let mut rows = Vec::new();
    for text in load_page_texts(&pdf.path)? {
        scan_page(&text, &pdf.subject, pdf.grade, &pdf.ref_url, &mut rows);
    }
    info!(subject = %pdf.subject, grade = pdf.grade, outcomes = rows.len(), "parsed design");
    Ok(rows)
}

pub fn render_csv(rows: &[SloRow]) -> String {
    render_table(SLO_HEADERS, rows.iter().map(SloRow::fields))
}

/// Write outcome rows to `path`, creating parent directories.
pub fn write_slo_csv(path: impl AsRef<Path>, rows: &[SloRow]) -> Result<()> {
    write_csv(path, SLO_HEADERS, rows.iter().map(SloRow::fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{normalize, parse};
    use std::fs;
    use tempfile::tempdir;

    const REF: &str = "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-seven-designs/";

    const PAGE: &str = "GRADE 7 MATHEMATICS\n\
        Strand 1.0:   Numbers\n\
        Sub-strand 1.1: Whole   Numbers\n\
        By the end of the sub-strand the learner should be able to:\n\
        1. read and write numbers up to millions,\n\
        2. apply place value in real life.\n\
        Sub-strand 1.2: Factors\n\
        3. identify factors of composite numbers\n\
        4.no space after the dot\n\
        Suggested learning experiences\n";

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a \t b\r\n  c  "), "a b c");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_outcomes_carry_current_strand_and_substrand() {
        let rows = extract_slo_rows(PAGE, "Mathematics", 7, REF);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].row_id, "MATH-G7-001");
        assert_eq!(rows[0].strand, "Strand 1.0: Numbers");
        assert_eq!(rows[0].substrand, "Sub-strand 1.1: Whole Numbers");
        assert_eq!(rows[0].slo, "1. read and write numbers up to millions,");

        assert_eq!(rows[1].substrand, "Sub-strand 1.1: Whole Numbers");
        assert_eq!(rows[2].row_id, "MATH-G7-003");
        assert_eq!(rows[2].strand, "Strand 1.0: Numbers");
        assert_eq!(rows[2].substrand, "Sub-strand 1.2: Factors");
        assert!(rows.iter().all(|r| r.cbc_level == "Junior School"));
        assert!(rows.iter().all(|r| r.ref_url == REF));
    }

    #[test]
    fn test_outcome_before_any_heading_has_empty_strand() {
        let rows = extract_slo_rows("12. stand-alone outcome\n", "Art", 10, "");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_id, "ART-G10-001");
        assert_eq!(rows[0].strand, "");
        assert_eq!(rows[0].substrand, "");
        assert_eq!(rows[0].cbc_level, "Senior School");
    }

    #[test]
    fn test_numbering_continues_across_pages_but_headings_do_not() {
        let mut rows = Vec::new();
        scan_page(PAGE, "Mathematics", 12, REF, &mut rows);
        scan_page("5. carried onto the next page\n", "Mathematics", 12, REF, &mut rows);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].row_id, "MATH-G12-004");
        assert_eq!(rows[3].strand, "");
        assert_eq!(rows[3].cbc_level, "Senior School");
    }

    #[test]
    fn test_rendered_csv_feeds_the_sync_pipeline() {
        let rows = extract_slo_rows(PAGE, "Mathematics", 7, REF);
        let text = render_csv(&rows);
        assert!(text.starts_with("RowId,CBC_Level,Grade,Subject,Strand,Substrand,SLO,KICD_RefURL\n"));

        let doc = normalize(&parse(&text), "pdf");
        assert_eq!(doc.meta.count, 3);
        assert_eq!(doc.entries[0].id, "MATH-G7-001");
        assert_eq!(doc.entries[0].grade, Some(7.into()));
        assert_eq!(
            doc.entries[0].concept,
            "Strand 1.0: Numbers — Sub-strand 1.1: Whole Numbers"
        );
        assert_eq!(doc.entries[0].cbc.slo, "1. read and write numbers up to millions,");
    }

    #[test]
    fn test_write_slo_csv() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("output").join("cbc_entries.csv");
        let rows = extract_slo_rows(PAGE, "Mathematics", 7, REF);
        write_slo_csv(&path, &rows)?;
        assert_eq!(parse(&fs::read_to_string(&path)?).len(), 3);
        Ok(())
    }

    #[test]
    fn test_unreadable_pdf_is_an_error() -> Result<()> {
        let tmp = tempdir()?;
        let missing = tmp.path().join("missing.pdf");
        let err = load_page_texts(&missing).unwrap_err();
        assert!(err.to_string().starts_with("loading PDF"));

        let junk = tmp.path().join("junk.pdf");
        fs::write(&junk, "definitely not a pdf")?;
        assert!(load_page_texts(&junk).is_err());
        Ok(())
    }
}
