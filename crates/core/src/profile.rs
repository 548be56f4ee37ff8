//! Basic dataset statistics surfaced to the narrative layer.
//!
//! Mirrors the shape of a dataframe `describe`: row/column counts, per
//! column null counts and inferred kinds, numeric summaries for numeric
//! columns, and range/distinct counts for date columns.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{CellValue, Dataset};

/// Inferred kind of a column, from its non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    Date,
    /// No non-null values to infer from.
    Empty,
    /// More than one value kind present.
    Mixed,
}

/// Describe-style summary for a numeric column (sample std dev, ddof = 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: u64,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

/// Range and cardinality of a date column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSummary {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub distinct: u64,
}

/// Basic statistics for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub total_rows: u64,
    pub total_columns: u64,
    pub null_counts: BTreeMap<String, u64>,
    pub column_kinds: BTreeMap<String, ColumnKind>,
    pub numeric_summary: BTreeMap<String, NumericSummary>,
    pub date_columns: BTreeMap<String, DateSummary>,
}

/// Profile a dataset. Deterministic and pure.
pub fn profile_dataset(dataset: &Dataset) -> DatasetProfile {
    let mut null_counts = BTreeMap::new();
    let mut column_kinds = BTreeMap::new();
    let mut numeric_summary = BTreeMap::new();
    let mut date_columns = BTreeMap::new();

    for column in dataset.columns() {
        let mut nulls = 0u64;
        let mut numbers: Vec<f64> = Vec::new();
        let mut dates: Vec<NaiveDate> = Vec::new();
        let mut texts = 0u64;
        let mut bools = 0u64;

        for cell in dataset.column_values(column) {
            match cell {
                CellValue::Null => nulls += 1,
                CellValue::Number(n) => numbers.push(*n),
                CellValue::Date(d) => dates.push(*d),
                CellValue::Text(_) => texts += 1,
                CellValue::Bool(_) => bools += 1,
            }
        }

        null_counts.insert(column.clone(), nulls);
        column_kinds.insert(
            column.clone(),
            infer_kind(numbers.len() as u64, texts, bools, dates.len() as u64),
        );

        if !numbers.is_empty() && texts == 0 && bools == 0 && dates.is_empty() {
            numeric_summary.insert(column.clone(), summarize_numeric(&numbers));
        }
        if !dates.is_empty() && numbers.is_empty() && texts == 0 && bools == 0 {
            let distinct = dates.iter().collect::<BTreeSet<_>>().len() as u64;
            let min = *dates.iter().min().unwrap_or(&dates[0]);
            let max = *dates.iter().max().unwrap_or(&dates[0]);
            date_columns.insert(column.clone(), DateSummary { min, max, distinct });
        }
    }

    DatasetProfile {
        total_rows: dataset.row_count() as u64,
        total_columns: dataset.column_count() as u64,
        null_counts,
        column_kinds,
        numeric_summary,
        date_columns,
    }
}

fn infer_kind(numbers: u64, texts: u64, bools: u64, dates: u64) -> ColumnKind {
    let kinds_present =
        [numbers > 0, texts > 0, bools > 0, dates > 0].iter().filter(|present| **present).count();
    match kinds_present {
        0 => ColumnKind::Empty,
        1 if numbers > 0 => ColumnKind::Numeric,
        1 if texts > 0 => ColumnKind::Text,
        1 if bools > 0 => ColumnKind::Boolean,
        1 => ColumnKind::Date,
        _ => ColumnKind::Mixed,
    }
}

fn summarize_numeric(values: &[f64]) -> NumericSummary {
    let count = values.len() as u64;
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    NumericSummary { count, mean, std_dev, min, max }
}
