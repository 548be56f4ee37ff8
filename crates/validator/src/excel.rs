//! Workbook cell scanner.
//!
//! Opens a spreadsheet in two views (cached computed values and formula
//! text) and walks every cell of every sheet, classifying cells and
//! collecting formula errors, formula risks, and scan statistics into a
//! [`ValidationReport`].

use std::path::Path;

use calamine::{open_workbook, CellErrorType, Data, Range, Reader, Xlsx};
use serde_json::json;

use dealiq_core::report::{FileType, IssueCategory, ValidationIssue, ValidationReport};

/// Spreadsheet error codes with their human-readable meanings. Closed set.
pub const EXCEL_ERRORS: [(&str, &str); 7] = [
    ("#DIV/0!", "Division by zero"),
    ("#VALUE!", "Wrong type of argument or operand"),
    ("#REF!", "Invalid cell reference"),
    ("#N/A", "Value not available"),
    ("#NAME?", "Unrecognized formula name"),
    ("#NULL!", "Invalid intersection of ranges"),
    ("#NUM!", "Invalid numeric value"),
];

fn error_meaning(code: &str) -> Option<&'static str> {
    EXCEL_ERRORS.iter().find(|(c, _)| *c == code).map(|(_, meaning)| *meaning)
}

/// Remediation hint for a given error code.
fn suggest_fix(code: &str) -> &'static str {
    match code {
        "#DIV/0!" => "Wrap formula in IFERROR() or check divisor is not zero",
        "#VALUE!" => "Check that all cell references contain expected data types",
        "#REF!" => "Cell reference is broken - check if referenced cells were deleted",
        "#N/A" => "Use IFERROR() or IFNA() to handle missing values",
        "#NAME?" => "Check formula function spelling - might be a typo",
        "#NULL!" => "Check range intersection syntax",
        "#NUM!" => "Check numeric argument is within valid range",
        _ => "Review formula logic",
    }
}

fn error_code(error: &CellErrorType) -> &'static str {
    match error {
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::NA => "#N/A",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Null => "#NULL!",
        CellErrorType::Num => "#NUM!",
        CellErrorType::GettingData => "#N/A",
    }
}

/// Textual division-by-zero risk check.
///
/// A static pattern match, not an evaluation: it flags safe patterns like
/// `/0.5` and misses semantically risky ones like `/SUM(B:B)`. Known
/// heuristic limitation, kept for report compatibility.
fn has_div_zero_risk(formula: &str) -> bool {
    formula.contains('/') && ["/0", "/(0)", "/ 0"].iter().any(|pattern| formula.contains(pattern))
}

/// A1-style reference for an absolute (row, col) position.
fn cell_reference(row: u32, col: u32) -> String {
    let mut letters = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    format!("{letters}{}", row + 1)
}

/// Scan a workbook file and build its validation report.
///
/// File-level failures (unreadable container) short-circuit to a single
/// critical `file` issue with a zero score. A failure reading one sheet is
/// recorded as a critical `error` issue for that sheet and the scan
/// continues with the remaining sheets.
pub fn validate_workbook(path: &Path) -> ValidationReport {
    let mut report = ValidationReport::new(path, FileType::Excel);

    let mut workbook: Xlsx<_> = match open_workbook(path) {
        Ok(workbook) => workbook,
        Err(error) => {
            report.fail_file(
                ValidationIssue::critical(
                    IssueCategory::File,
                    "N/A",
                    format!("Invalid Excel file: {error}"),
                )
                .with_suggestion("Regenerate the workbook from source data"),
            );
            return report;
        }
    };

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut total_cells = 0u64;
    let mut formula_cells = 0u64;
    let mut error_cells = 0u64;
    let mut empty_cells = 0u64;
    let mut numeric_cells = 0u64;

    for sheet_name in &sheet_names {
        tracing::debug!(sheet = %sheet_name, "scanning sheet");

        let values = match workbook.worksheet_range(sheet_name) {
            Ok(range) => range,
            Err(error) => {
                report.add_issue(ValidationIssue::critical(
                    IssueCategory::Error,
                    format!("{sheet_name}!N/A"),
                    format!("Failed to read sheet: {error}"),
                ));
                continue;
            }
        };
        let formulas: Range<String> =
            workbook.worksheet_formula(sheet_name).unwrap_or_else(|_| Range::empty());

        let (start_row, start_col) = values.start().unwrap_or((0, 0));
        for (row_offset, row) in values.rows().enumerate() {
            for (col_offset, cell) in row.iter().enumerate() {
                total_cells += 1;
                let abs_row = start_row + row_offset as u32;
                let abs_col = start_col + col_offset as u32;

                let formula_text = formulas
                    .get_value((abs_row, abs_col))
                    .filter(|text| !text.is_empty())
                    .map(|text| {
                        if text.starts_with('=') {
                            text.clone()
                        } else {
                            format!("={text}")
                        }
                    });

                // Computed-value view: match the closed error-code set.
                let observed_error = match cell {
                    Data::Error(error) => Some(error_code(error)),
                    Data::String(text) => error_meaning(text.as_str()).map(|_| text.as_str()),
                    _ => None,
                };
                if let Some(code) = observed_error {
                    error_cells += 1;
                    let meaning = error_meaning(code).unwrap_or("Formula error");
                    let mut issue = ValidationIssue::critical(
                        IssueCategory::FormulaError,
                        format!("{sheet_name}!{}", cell_reference(abs_row, abs_col)),
                        meaning,
                    )
                    .with_value(code)
                    .with_suggestion(suggest_fix(code));
                    if let Some(formula) = &formula_text {
                        issue = issue.with_formula(formula.clone());
                    }
                    report.add_issue(issue);
                }

                if let Some(formula) = &formula_text {
                    formula_cells += 1;
                    if has_div_zero_risk(formula) {
                        report.add_issue(
                            ValidationIssue::warning(
                                IssueCategory::FormulaQuality,
                                format!("{sheet_name}!{}", cell_reference(abs_row, abs_col)),
                                "Potential division by zero risk",
                            )
                            .with_formula(formula.clone())
                            .with_suggestion(
                                "Consider using IFERROR() or IF() to handle zero divisors",
                            ),
                        );
                    }
                }

                match cell {
                    Data::Int(_) | Data::Float(_) => numeric_cells += 1,
                    Data::Empty => empty_cells += 1,
                    Data::String(text) if text.trim().is_empty() => empty_cells += 1,
                    _ => {}
                }
            }
        }
    }

    let formula_percentage = if total_cells > 0 {
        (formula_cells as f64 / total_cells as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };
    report.record_summary("total_sheets", json!(sheet_names.len()));
    report.record_summary("total_cells", json!(total_cells));
    report.record_summary("formula_cells", json!(formula_cells));
    report.record_summary("error_cells", json!(error_cells));
    report.record_summary("empty_cells", json!(empty_cells));
    report.record_summary("numeric_cells", json!(numeric_cells));
    report.record_summary("formula_percentage", json!(formula_percentage));
    report.record_summary("sheets", json!(sheet_names));

    if formula_cells > 0 {
        report.add_issue(
            ValidationIssue::info(
                IssueCategory::Quality,
                "All Sheets",
                format!("{formula_cells} formula-driven calculations found"),
            )
            .with_suggestion("Formula-based analysis is best practice"),
        );
    }
    if error_cells == 0 {
        report.add_issue(ValidationIssue::info(
            IssueCategory::Quality,
            "All Sheets",
            "No formula errors detected",
        ));
    }

    report.finalize_quality_score();
    report
}
