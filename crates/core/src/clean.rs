//! Data cleaning for detected CRM fields.
//!
//! Cleaning never fails: unparseable values degrade to null rather than
//! aborting the pipeline. The input dataset is never mutated; a cleaned
//! copy is returned. Every pass here is idempotent, so cleaning an already
//! cleaned dataset is a no-op.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use crate::dataset::{CellValue, Dataset};
use crate::schema::{CrmField, CrmSchema};

/// Currency symbols and separators stripped from amount strings.
const CURRENCY_CHARS: [char; 5] = ['$', '£', '€', '¥', ','];

/// Date formats accepted for close/created date columns, tried in order.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Clean a dataset according to its detected schema.
///
/// - amount: currency symbols stripped, coerced to numeric, failures → null
/// - close/created date: parsed with a tolerant format list, failures → null
/// - stage: whitespace normalized and title-cased
/// - fully duplicate rows removed (first occurrence kept)
pub fn clean_dataset(dataset: &Dataset, schema: &CrmSchema) -> Dataset {
    let mut cleaned = dataset.clone();

    if let Some(idx) = schema.get(CrmField::Amount).and_then(|col| cleaned.column_index(col)) {
        apply_column(&mut cleaned, idx, coerce_amount);
    }

    for field in [CrmField::CloseDate, CrmField::CreatedDate] {
        if let Some(idx) = schema.get(field).and_then(|col| cleaned.column_index(col)) {
            apply_column(&mut cleaned, idx, coerce_date);
        }
    }

    if let Some(idx) = schema.get(CrmField::Stage).and_then(|col| cleaned.column_index(col)) {
        apply_column(&mut cleaned, idx, normalize_stage);
    }

    drop_duplicate_rows(&mut cleaned)
}

fn apply_column(dataset: &mut Dataset, idx: usize, f: fn(&CellValue) -> CellValue) {
    let columns = dataset.columns().to_vec();
    let mut rebuilt = Dataset::new(columns);
    for row in dataset.rows() {
        let mut row = row.clone();
        row[idx] = f(&row[idx]);
        rebuilt.push_row(row);
    }
    *dataset = rebuilt;
}

/// Strip currency symbols and coerce to a number; anything that still does
/// not parse becomes null.
fn coerce_amount(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(n) => CellValue::Number(*n),
        CellValue::Text(s) => {
            let stripped: String = s.chars().filter(|c| !CURRENCY_CHARS.contains(c)).collect();
            match stripped.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Null,
            }
        }
        _ => CellValue::Null,
    }
}

fn coerce_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::Text(s) => match parse_date(s) {
            Some(d) => CellValue::Date(d),
            None => CellValue::Null,
        },
        _ => CellValue::Null,
    }
}

/// Parse a date string against the accepted format list, falling back to
/// RFC 3339 / `T`-separated timestamps.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts.date());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.date());
    }
    None
}

fn normalize_stage(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(s) => CellValue::Text(title_case(s.trim())),
        other => other.clone(),
    }
}

/// Title-case a stage name: every letter that follows a non-letter is
/// uppercased, the rest lowercased ("closed-won" → "Closed-Won").
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

/// Remove fully duplicate rows, keeping the first occurrence.
fn drop_duplicate_rows(dataset: &mut Dataset) -> Dataset {
    let mut seen: HashSet<String> = HashSet::with_capacity(dataset.row_count());
    let mut deduped = Dataset::new(dataset.columns().to_vec());
    for row in dataset.rows() {
        let key = row_key(row);
        if seen.insert(key) {
            deduped.push_row(row.clone());
        }
    }
    deduped
}

fn row_key(row: &[CellValue]) -> String {
    let mut key = String::new();
    for cell in row {
        match cell {
            CellValue::Null => key.push('\u{0}'),
            CellValue::Text(s) => {
                key.push('t');
                key.push_str(s);
            }
            CellValue::Number(n) => {
                key.push('n');
                key.push_str(&n.to_bits().to_string());
            }
            CellValue::Bool(b) => key.push(if *b { 'T' } else { 'F' }),
            CellValue::Date(d) => {
                key.push('d');
                key.push_str(&d.to_string());
            }
        }
        key.push('\u{1f}');
    }
    key
}
