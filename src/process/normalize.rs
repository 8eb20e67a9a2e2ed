// src/process/normalize.rs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::debug;

use super::csv::RawRow;

/// Separator placed between strand and substrand in `Concept`.
pub const CONCEPT_SEPARATOR: &str = " — ";

/// `meta.source` when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "Google Sheet CSV";

pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// Curriculum classification carried alongside each entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbcMeta {
    pub level: String,
    pub strand: String,
    pub substrand: String,
    pub slo: String,
    #[serde(rename = "ref")]
    pub ref_url: String,
    pub pathway: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    #[serde(rename = "id")]
    pub id: String,
    pub grade: Option<Number>,
    pub subject: String,
    pub concept: String,
    pub student_question: String,
    #[serde(rename = "AIGuidedHint")]
    pub ai_guided_hint: String,
    pub related_prompt1: String,
    pub related_prompt2: String,
    pub difficulty: String,
    pub tags: String,
    #[serde(rename = "_cbc")]
    pub cbc: CbcMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub source: String,
    pub generated_at: String,
    pub count: usize,
}

/// The `entries.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub meta: Meta,
    pub entries: Vec<Entry>,
}

/// Keep only the ASCII digits of `raw` and read them as a number.
///
/// Signs, letters and separators are discarded, so `"-1"` reads as `1` and
/// `"Grade K"` has no grade. Digit runs that overflow `u64` fall back to a
/// float; only a run too long to be finite, or no digits at all, gives
/// `None`.
pub fn to_grade_number(raw: &str) -> Option<Number> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<u64>() {
        Ok(n) => Some(Number::from(n)),
        Err(_) => digits.parse::<f64>().ok().and_then(Number::from_f64),
    }
}

/// Render a timestamp the way `meta.generatedAt` and `version.txt` carry it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Map one raw row onto the canonical entry shape.
pub fn normalize_row(row: &RawRow) -> Entry {
    let strand = row.value("Strand");
    let substrand = row.value("Substrand");

    Entry {
        id: row.value("RowId").to_string(),
        grade: to_grade_number(row.value("Grade")),
        subject: row.value("Subject").to_string(),
        concept: format!("{}{}{}", strand, CONCEPT_SEPARATOR, substrand),
        student_question: row.value("StudentQuestion").to_string(),
        ai_guided_hint: row.value("GuidedHint").to_string(),
        related_prompt1: row.value("FollowUp1").to_string(),
        related_prompt2: row.value("FollowUp2").to_string(),
        difficulty: or_default(row.value("Difficulty"), DEFAULT_DIFFICULTY).to_string(),
        tags: row.value("Tags").to_string(),
        cbc: CbcMeta {
            level: row.value("CBC_Level").to_string(),
            strand: strand.to_string(),
            substrand: substrand.to_string(),
            slo: row.value("SLO").to_string(),
            ref_url: row.value("KICD_RefURL").to_string(),
            pathway: row.value("Pathway").to_string(),
        },
    }
}

/// Normalize every row, stamping the document with `generated_at`.
pub fn normalize_at(rows: &[RawRow], source: &str, generated_at: DateTime<Utc>) -> OutputDocument {
    let entries: Vec<Entry> = rows.iter().map(normalize_row).collect();
    debug!(entries = entries.len(), "normalized rows");

    OutputDocument {
        meta: Meta {
            source: source.to_string(),
            generated_at: format_timestamp(generated_at),
            count: entries.len(),
        },
        entries,
    }
}

/// Normalize every row, stamped with the current wall-clock time.
pub fn normalize(rows: &[RawRow], source: &str) -> OutputDocument {
    normalize_at(rows, source, Utc::now())
}
