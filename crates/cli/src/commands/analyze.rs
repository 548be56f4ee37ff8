use std::path::Path;

use dealiq_core::{clean_dataset, compute_metrics, detect_schema, profile_dataset};
use dealiq_ingest::load_dataset;

use super::CommandResult;

/// Run the full analysis pipeline: ingest, schema detection, cleaning,
/// metrics, and profile of the cleaned dataset.
pub fn run(file: &Path) -> CommandResult {
    let dataset = match load_dataset(file) {
        Ok(dataset) => dataset,
        Err(error) => {
            return CommandResult::failure("analyze", "ingest", error.to_string(), 1);
        }
    };

    let schema = detect_schema(&dataset);
    let cleaned = clean_dataset(&dataset, &schema);
    let metrics = compute_metrics(&cleaned, &schema);
    let profile = profile_dataset(&cleaned);

    let data = serde_json::json!({
        "rows_loaded": dataset.row_count(),
        "rows_after_cleaning": cleaned.row_count(),
        "schema": schema,
        "metrics": metrics,
        "profile": profile,
    });
    CommandResult::success(
        "analyze",
        format!("analyzed {} row(s), {} CRM field(s) detected", cleaned.row_count(), schema.len()),
        Some(data),
    )
}
