use std::path::Path;

use dealiq_core::detect_schema;
use dealiq_ingest::load_dataset;

use super::CommandResult;

/// Detect the CRM schema of a tabular export without running the pipeline.
pub fn run(file: &Path) -> CommandResult {
    let dataset = match load_dataset(file) {
        Ok(dataset) => dataset,
        Err(error) => return CommandResult::failure("schema", "ingest", error.to_string(), 1),
    };

    let schema = detect_schema(&dataset);
    let data = serde_json::json!({
        "columns": dataset.columns(),
        "schema": schema,
    });
    CommandResult::success(
        "schema",
        format!("{} of {} column(s) mapped to CRM fields", schema.len(), dataset.column_count()),
        Some(data),
    )
}
