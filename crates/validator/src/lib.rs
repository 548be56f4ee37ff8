//! Output validation for generated deliverables.
//!
//! [`validate`] is the single entry point: it dispatches on the file
//! extension to the workbook or document scanner and always returns a
//! structured [`ValidationReport`]: degraded inputs produce critical
//! issues, never errors past this boundary.

pub mod excel;
pub mod pdf;
pub mod store;

use std::path::Path;

use dealiq_core::report::{FileType, IssueCategory, ValidationIssue, ValidationReport};

pub use store::{ReportStore, StoreError, StoredReport};

/// Validate a deliverable file, dispatching by extension.
///
/// `.xlsx`/`.xlsm` → workbook scan, `.pdf` → document scan; a missing file
/// or unsupported extension yields a single critical `file` issue with a
/// pinned zero score.
pub fn validate(path: impl AsRef<Path>) -> ValidationReport {
    let path = path.as_ref();

    if !path.exists() {
        let mut report = ValidationReport::new(path, FileType::Unknown);
        report.fail_file(ValidationIssue::critical(
            IssueCategory::File,
            "N/A",
            format!("File not found: {}", path.display()),
        ));
        return report;
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    tracing::info!(file_path = %path.display(), extension = %extension, "validating output file");

    match extension.as_str() {
        "xlsx" | "xlsm" => excel::validate_workbook(path),
        "pdf" => pdf::validate_document(path),
        _ => {
            let mut report = ValidationReport::new(path, FileType::Unknown);
            report.fail_file(
                ValidationIssue::critical(
                    IssueCategory::File,
                    "N/A",
                    format!("Unsupported file type: .{extension}"),
                )
                .with_suggestion("Only .xlsx, .xlsm, and .pdf outputs can be validated"),
            );
            report
        }
    }
}
