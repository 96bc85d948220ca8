// src/table/mod.rs
//! Lenient CSV reader for published spreadsheet exports.
//!
//! The exports are hand-authored and never schema-validated, so nothing in
//! here fails: malformed quoting, ragged rows and empty bodies all degrade
//! to best-effort output.

pub mod value;

pub use value::{is_active, to_num};

/// One data row keyed by the trimmed header cells of its table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Insert or overwrite `key`. A repeated header keeps its first
    /// position but takes the later column's value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First candidate that resolves wins; each candidate is tried as an
    /// exact key, then against every key trimmed and case-folded.
    /// Missing fields read as "".
    pub fn pick(&self, candidates: &[&str]) -> &str {
        for cand in candidates {
            if let Some(v) = self.get(cand) {
                return v;
            }
            let wanted = cand.trim().to_lowercase();
            if let Some((_, v)) = self
                .fields
                .iter()
                .find(|(k, _)| k.trim().to_lowercase() == wanted)
            {
                return v;
            }
        }
        ""
    }

    /// `pick` with the result trimmed, the way every normalizer reads cells.
    pub fn text(&self, candidates: &[&str]) -> String {
        self.pick(candidates).trim().to_string()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Split `text` into rows of raw cells.
///
/// Commas separate fields and `\n` ends a row. A double quote toggles
/// quoted mode; inside it `""` is a literal quote and commas/newlines are
/// content. `\r` is dropped everywhere. Trailing all-blank rows are removed.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' {
            continue;
        }

        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cur.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cur.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cur)),
            '\n' => {
                row.push(std::mem::take(&mut cur));
                rows.push(std::mem::take(&mut row));
            }
            _ => cur.push(ch),
        }
    }

    row.push(cur);
    rows.push(row);

    while rows.last().is_some_and(|r| is_blank_row(r)) {
        rows.pop();
    }
    rows
}

/// Zip rows with the first (header) row. Blank rows are skipped, short
/// rows are padded with "" and extra cells are ignored.
pub fn rows_to_records(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    body.iter()
        .filter(|r| !is_blank_row(r))
        .map(|r| {
            let mut rec = Record::default();
            for (i, key) in header.iter().enumerate() {
                rec.insert(key.clone(), r.get(i).cloned().unwrap_or_default());
            }
            rec
        })
        .collect()
}

/// Parse a CSV body into header-keyed records, in source order.
pub fn parse(text: &str) -> Vec<Record> {
    rows_to_records(&parse_rows(text))
}
