use std::path::Path;

use dealiq_core::config::AppConfig;
use dealiq_validator::{validate, ReportStore};

use super::CommandResult;

/// Validate a generated deliverable and optionally persist the report.
///
/// Exit code 0 means the file is valid; 1 means validation found critical
/// issues; 2 means the report could not be persisted.
pub fn run(file: &Path, save: bool, config: &AppConfig) -> CommandResult {
    let report = validate(file);

    let mut data = serde_json::json!({ "report": report });
    if save {
        let store = ReportStore::new(&config.storage.reports_dir);
        match store.persist(&report) {
            Ok(stored) => {
                data["task_id"] = serde_json::json!(stored.task_id);
                data["report_path"] = serde_json::json!(stored.path);
            }
            Err(error) => {
                return CommandResult::failure(
                    "validate",
                    "report_store",
                    format!("could not persist report: {error}"),
                    2,
                );
            }
        }
    }

    let message = if report.is_valid {
        format!("validation passed with quality score {}", report.quality_score)
    } else {
        format!(
            "validation failed: {} critical issue(s), quality score {}",
            report.critical_issues, report.quality_score
        )
    };
    let exit_code = u8::from(!report.is_valid);
    let mut result = CommandResult::success("validate", message, Some(data));
    result.exit_code = exit_code;
    result
}
