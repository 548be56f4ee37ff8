//! PDF document validator.
//!
//! Extracts text per page and folds findings into the same report shape as
//! the workbook scanner. Extraction failures are isolated per page; one
//! bad page never aborts the scan.

use std::path::Path;

use lopdf::Document;
use serde_json::json;

use dealiq_core::report::{FileType, IssueCategory, ValidationIssue, ValidationReport};

/// Pages with fewer extracted characters than this are flagged as empty.
const MIN_PAGE_CHARS: usize = 10;

/// Documents with fewer total characters than this get a low-content warning.
const MIN_DOCUMENT_CHARS: usize = 100;

/// Scan a PDF file and build its validation report.
pub fn validate_document(path: &Path) -> ValidationReport {
    let mut report = ValidationReport::new(path, FileType::Pdf);

    let document = match Document::load(path) {
        Ok(document) => document,
        Err(error) => {
            report.fail_file(
                ValidationIssue::critical(
                    IssueCategory::File,
                    "N/A",
                    format!("Invalid PDF file: {error}"),
                )
                .with_suggestion("Regenerate the PDF document"),
            );
            return report;
        }
    };

    let pages = document.get_pages();
    let page_count = pages.len();
    let file_size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);

    if page_count == 0 {
        report.add_issue(
            ValidationIssue::critical(IssueCategory::Content, "Document", "PDF has no pages")
                .with_suggestion("Regenerate the PDF document"),
        );
    }

    let mut total_characters = 0usize;
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => {
                let chars = text.chars().count();
                total_characters += chars;
                if text.trim().chars().count() < MIN_PAGE_CHARS {
                    report.add_issue(
                        ValidationIssue::warning(
                            IssueCategory::Content,
                            format!("Page {page_number}"),
                            "Page appears to be empty or has minimal content",
                        )
                        .with_suggestion("Verify page content is rendering correctly"),
                    );
                }
            }
            Err(error) => {
                report.add_issue(ValidationIssue::warning(
                    IssueCategory::Extraction,
                    format!("Page {page_number}"),
                    format!("Could not extract text: {error}"),
                ));
            }
        }
    }

    let file_size_kb = (file_size as f64 / 1024.0 * 10.0).round() / 10.0;
    report.record_summary("total_pages", json!(page_count));
    report.record_summary("file_size_kb", json!(file_size_kb));
    report.record_summary("total_characters", json!(total_characters));
    report.record_summary("has_metadata", json!(has_metadata(&document)));

    if page_count > 0 {
        let plural = if page_count > 1 { "s" } else { "" };
        report.add_issue(ValidationIssue::info(
            IssueCategory::Quality,
            "Document",
            format!("{page_count} page{plural} generated successfully"),
        ));
    }
    if total_characters > MIN_DOCUMENT_CHARS {
        report.add_issue(ValidationIssue::info(
            IssueCategory::Quality,
            "Document",
            format!("{total_characters} characters of content extracted"),
        ));
    } else {
        report.add_issue(
            ValidationIssue::warning(
                IssueCategory::Content,
                "Document",
                "PDF has very little text content",
            )
            .with_suggestion("Verify the document generated correctly"),
        );
    }

    report.finalize_quality_score();
    report
}

fn has_metadata(document: &Document) -> bool {
    document.trailer.get(b"Info").is_ok()
}
