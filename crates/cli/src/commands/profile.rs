use std::path::Path;

use dealiq_core::profile_dataset;
use dealiq_ingest::load_dataset;

use super::CommandResult;

/// Basic statistics of a raw (uncleaned) tabular export.
pub fn run(file: &Path) -> CommandResult {
    let dataset = match load_dataset(file) {
        Ok(dataset) => dataset,
        Err(error) => return CommandResult::failure("profile", "ingest", error.to_string(), 1),
    };

    let profile = profile_dataset(&dataset);
    let message = format!("{} row(s), {} column(s)", profile.total_rows, profile.total_columns);
    CommandResult::success("profile", message, Some(serde_json::json!({ "profile": profile })))
}
