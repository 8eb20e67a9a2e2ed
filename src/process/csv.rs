// src/process/csv.rs

use std::{borrow::Cow, mem, sync::Arc};

/// One data row keyed by the header row.
///
/// Every row carries exactly one value per header, in header order. Cells
/// missing from a short source row are empty strings; cells beyond the
/// header count are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRow {
    /// Value for `header`, or `None` when the column does not exist.
    ///
    /// With duplicate header names the right-most column wins.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.headers
            .iter()
            .rposition(|h| h == header)
            .map(|idx| self.values[idx].as_str())
    }

    /// Like [`RawRow::get`], but an absent column reads as `""`.
    pub fn value(&self, header: &str) -> &str {
        self.get(header).unwrap_or("")
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(header, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Split `text` into rows of untrimmed cells.
///
/// Single pass with one character of lookahead. Inside quotes, `""` is a
/// literal quote and CR/LF are kept verbatim. Outside quotes, `\n`, `\r`
/// and `\r\n` each end a row. Whatever is buffered at end of input is
/// flushed as a final row, including an unterminated quoted field.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(mem::take(&mut cell)),
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(mem::take(&mut cell));
                rows.push(mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }

    row.push(cell);
    rows.push(row);
    rows
}

const BOM: char = '\u{feff}';

/// Trim whitespace and stray byte-order marks from both ends of a cell.
fn trim_cell(cell: &str) -> &str {
    cell.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

/// Parse CSV text into header-keyed rows.
///
/// A leading byte-order mark is ignored. The first row is the header
/// (names trimmed). Rows whose cells are all empty or whitespace are
/// dropped. Never fails: empty input and a lone header both yield no rows.
pub fn parse(text: &str) -> Vec<RawRow> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rows = tokenize(text).into_iter();
    let headers: Arc<[String]> = match rows.next() {
        Some(first) => first.iter().map(|h| trim_cell(h).to_string()).collect(),
        None => return Vec::new(),
    };

    rows.filter(|cells| cells.iter().any(|c| !trim_cell(c).is_empty()))
        .map(|cells| {
            let values = (0..headers.len())
                .map(|idx| cells.get(idx).map(|c| trim_cell(c)).unwrap_or("").to_string())
                .collect();
            RawRow {
                headers: Arc::clone(&headers),
                values,
            }
        })
        .collect()
}

/// Quote a field when it holds a delimiter, a quote or a line break.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render one record as a CSV line, without the line terminator.
pub fn format_record<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| quote_field(f.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Render a header line plus one line per row, each `\n`-terminated.
pub fn render_table<I, R, S>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = format_record(headers);
    out.push('\n');
    for row in rows {
        out.push_str(&format_record(row));
        out.push('\n');
    }
    out
}
