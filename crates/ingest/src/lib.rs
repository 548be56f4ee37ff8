//! Tabular ingestion of CRM exports.
//!
//! Loads CSV, Excel, and JSON files into the shared [`Dataset`] model.
//! Ingestion is the one fallible stage of the analysis pipeline: a file
//! that cannot be read or has no recognizable tabular shape is a typed
//! error here, while value-level problems (bad numbers, bad dates) are
//! deferred to the cleaning stage, which degrades them to nulls.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use dealiq_core::dataset::{CellValue, Dataset};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file type: `{0}` (expected .csv, .xlsx, .xls, or .json)")]
    UnsupportedExtension(String),
    #[error("could not read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("could not parse CSV `{path}`: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("could not open workbook `{path}`: {source}")]
    Workbook { path: PathBuf, source: calamine::Error },
    #[error("workbook has no sheets: {0}")]
    EmptyWorkbook(PathBuf),
    #[error("could not parse JSON `{path}`: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("JSON root must be an array of objects: {0}")]
    InvalidJsonShape(PathBuf),
}

/// Load a tabular dataset, dispatching by file extension.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, IngestError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    tracing::info!(file_path = %path.display(), extension = %extension, "loading dataset");

    match extension.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xls" => load_workbook(path),
        "json" => load_json(path),
        other => Err(IngestError::UnsupportedExtension(format!(".{other}"))),
    }
}

/// Infer a typed cell from raw text: empty → null, numbers and booleans
/// recognized, everything else kept as text. Dates stay textual here; the
/// cleaning stage parses them for mapped date columns.
fn infer_cell(text: &str) -> CellValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        return CellValue::Number(number);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => CellValue::Text(text.to_string()),
    }
}

fn load_csv(path: &Path) -> Result<Dataset, IngestError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|source| IngestError::Csv { path: path.to_path_buf(), source })?;

    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv { path: path.to_path_buf(), source })?
        .iter()
        .map(str::to_string)
        .collect();

    let mut dataset = Dataset::new(headers);
    for record in reader.records() {
        let record =
            record.map_err(|source| IngestError::Csv { path: path.to_path_buf(), source })?;
        dataset.push_row(record.iter().map(infer_cell).collect());
    }
    Ok(dataset)
}

fn load_workbook(path: &Path) -> Result<Dataset, IngestError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|source| IngestError::Workbook { path: path.to_path_buf(), source })?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|source| IngestError::Workbook { path: path.to_path_buf(), source })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(Dataset::default()),
    };

    let mut dataset = Dataset::new(headers);
    for row in rows {
        dataset.push_row(row.iter().map(workbook_cell).collect());
    }
    Ok(dataset)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(text) => text.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(text) => {
            if text.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(text.clone())
            }
        }
        Data::Float(number) => CellValue::Number(*number),
        Data::Int(number) => CellValue::Number(*number as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(datetime) => match datetime.as_datetime() {
            Some(parsed) => CellValue::Date(parsed.date()),
            None => CellValue::Null,
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        // an error cell carries no analyzable value
        Data::Error(_) => CellValue::Null,
    }
}

fn load_json(path: &Path) -> Result<Dataset, IngestError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| IngestError::Io { path: path.to_path_buf(), source })?;
    let root: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|source| IngestError::Json { path: path.to_path_buf(), source })?;

    let records = root
        .as_array()
        .ok_or_else(|| IngestError::InvalidJsonShape(path.to_path_buf()))?;

    // columns = union of keys, first-seen order; requires serde_json's
    // `preserve_order` feature, the default Map alphabetizes keys
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let object =
            record.as_object().ok_or_else(|| IngestError::InvalidJsonShape(path.to_path_buf()))?;
        for key in object.keys() {
            if !columns.iter().any(|existing| existing == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut dataset = Dataset::new(columns.clone());
    for record in records {
        let object = record.as_object().expect("validated above");
        let row = columns
            .iter()
            .map(|column| object.get(column).map(json_cell).unwrap_or(CellValue::Null))
            .collect();
        dataset.push_row(row);
    }
    Ok(dataset)
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => {
            n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null)
        }
        serde_json::Value::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.clone())
            }
        }
        other => CellValue::Text(other.to_string()),
    }
}
