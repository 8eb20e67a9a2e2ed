// src/scrape/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{info, warn};
use url::Url;

use crate::{output::write_csv, process::render_table};

/// KICD curriculum-design pages, one per grade.
pub static GRADE_PAGES: &[(u32, &str)] = &[
    (7, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-seven-designs/"),
    (8, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-eight-designs/"),
    (9, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-nine-designs/"),
    (10, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-ten/"),
    (11, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-eleven/"),
    (12, "https://kicd.ac.ke/cbc-materials/curriculum-designs/grade-twelve/"),
];

/// Column layout of the source sheet.
pub const SEED_HEADERS: &[&str] = &[
    "RowId",
    "CBC_Level",
    "Grade",
    "Subject",
    "Strand",
    "Substrand",
    "SLO",
    "StudentQuestion",
    "GuidedHint",
    "FollowUp1",
    "FollowUp2",
    "Difficulty",
    "Tags",
    "KICD_RefURL",
    "Pathway",
];

/// Last grade taught in Junior School.
const JUNIOR_SCHOOL_MAX_GRADE: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectLink {
    pub subject: String,
    pub href: String,
}

/// One sheet row seeded from a subject link; curriculum detail columns stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRow {
    pub row_id: String,
    pub cbc_level: String,
    pub grade: u32,
    pub subject: String,
    pub ref_url: String,
    pub pathway: String,
}

impl SeedRow {
    pub fn new(grade: u32, index: usize, link: &SubjectLink) -> Self {
        let junior = grade <= JUNIOR_SCHOOL_MAX_GRADE;
        Self {
            row_id: format!("{}-G{}-{:03}", link.subject, grade, index),
            cbc_level: if junior { "Junior School" } else { "Senior School" }.to_string(),
            grade,
            subject: link.subject.clone(),
            ref_url: link.href.clone(),
            pathway: if junior { "" } else { "TBD" }.to_string(),
        }
    }

    /// Cell values in [`SEED_HEADERS`] order.
    pub fn fields(&self) -> Vec<String> {
        SEED_HEADERS
            .iter()
            .map(|&h| match h {
                "RowId" => self.row_id.clone(),
                "CBC_Level" => self.cbc_level.clone(),
                "Grade" => self.grade.to_string(),
                "Subject" => self.subject.clone(),
                "KICD_RefURL" => self.ref_url.clone(),
                "Pathway" => self.pathway.clone(),
                _ => String::new(),
            })
            .collect()
    }
}

/// Collect anchors that look like curriculum-design links.
///
/// Keeps anchors with visible text whose `href` mentions "design" or
/// "curriculum". Relative hrefs are resolved against `base`.
pub fn extract_subject_links(html: &str, base: &Url) -> Vec<SubjectLink> {
    let selector = Selector::parse("a[href]").expect("anchor selector should parse");
    let doc = Html::parse_document(html);

    doc.select(&selector)
        .filter_map(|elem| {
            let href = elem.value().attr("href")?.trim();
            let subject = elem
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if subject.is_empty() || href.is_empty() {
                return None;
            }
            if !(href.contains("design") || href.contains("curriculum")) {
                return None;
            }
            let href = base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string());
            Some(SubjectLink { subject, href })
        })
        .collect()
}

/// Fetch one grade page and turn its subject links into seed rows.
#[tracing::instrument(level = "info", skip(client))]
pub async fn scrape_grade(client: &Client, grade: u32, page: &str) -> Result<Vec<SeedRow>> {
    let base = Url::parse(page).with_context(|| format!("parsing grade page URL {}", page))?;
    let html = client
        .get(base.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", page))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {}", page))?;

    Ok(extract_subject_links(&html, &base)
        .iter()
        .enumerate()
        .map(|(i, link)| SeedRow::new(grade, i + 1, link))
        .collect())
}

/// Scrape every grade page in order. A failing page is logged and skipped.
pub async fn scrape_all(client: &Client, pages: &[(u32, &str)]) -> Vec<SeedRow> {
    let mut rows = Vec::new();
    for &(grade, page) in pages {
        match scrape_grade(client, grade, page).await {
            Ok(found) => {
                info!(grade, subjects = found.len(), "grade scraped");
                rows.extend(found);
            }
            Err(e) => warn!(grade, "failed grade {}: {:#}", grade, e),
        }
    }
    rows
}

/// Render seed rows as sheet-shaped CSV text, header first.
pub fn render_csv(rows: &[SeedRow]) -> String {
    render_table(SEED_HEADERS, rows.iter().map(SeedRow::fields))
}

/// Write seed rows to `path`, creating parent directories.
pub fn write_seed_csv(path: impl AsRef<Path>, rows: &[SeedRow]) -> Result<()> {
    write_csv(path, SEED_HEADERS, rows.iter().map(SeedRow::fields))
}
