//! End-to-end workbook scans over synthesized xlsx fixtures.

use std::path::PathBuf;

use rust_xlsxwriter::{Formula, Workbook};
use tempfile::TempDir;

use dealiq_core::report::{IssueCategory, Severity};
use dealiq_validator::validate;

fn fixture_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Three sheets, 50 cells, one formula whose cached value is `#DIV/0!`.
#[test]
fn divide_by_zero_workbook_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = fixture_path(&dir, "forecast.xlsx");

    let mut workbook = Workbook::new();

    // Sheet1: 4x5 numbers
    let sheet1 = workbook.add_worksheet();
    for row in 0..4u32 {
        for col in 0..5u16 {
            sheet1.write_number(row, col, (row + 1) as f64 * (col + 1) as f64).unwrap();
        }
    }

    // Sheet2: 4x5 labels
    let sheet2 = workbook.add_worksheet();
    for row in 0..4u32 {
        for col in 0..5u16 {
            sheet2.write_string(row, col, format!("label-{row}-{col}")).unwrap();
        }
    }

    // Sheet3: 2x5 with a division formula whose cached result is the error
    let sheet3 = workbook.add_worksheet();
    sheet3.write_number(0, 0, 10.0).unwrap();
    sheet3.write_number(0, 1, 0.0).unwrap();
    for col in 2..5u16 {
        sheet3.write_number(0, col, 1.0).unwrap();
    }
    sheet3.write_formula(1, 0, Formula::new("=A1/B1").set_result("#DIV/0!")).unwrap();
    for col in 1..5u16 {
        sheet3.write_number(1, col, 2.0).unwrap();
    }

    workbook.save(&path).unwrap();

    let report = validate(&path);

    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert!(report.quality_score <= 40);
    assert_eq!(
        report.total_issues,
        report.critical_issues + report.warnings + report.info_messages
    );

    let error_issue = report
        .issues
        .iter()
        .find(|issue| issue.category == IssueCategory::FormulaError)
        .expect("formula error issue");
    assert_eq!(error_issue.severity, Severity::Critical);
    assert_eq!(error_issue.location, "Sheet3!A2");
    assert_eq!(error_issue.message, "Division by zero");
    assert_eq!(error_issue.value.as_deref(), Some("#DIV/0!"));
    assert_eq!(error_issue.formula.as_deref(), Some("=A1/B1"));
    assert!(error_issue.suggestion.is_some());

    assert_eq!(report.summary["total_sheets"], 3);
    assert_eq!(report.summary["total_cells"], 50);
    assert_eq!(report.summary["error_cells"], 1);
    assert_eq!(report.summary["sheets"][2], "Sheet3");
}

#[test]
fn risky_division_formula_is_flagged_as_warning() {
    let dir = TempDir::new().unwrap();
    let path = fixture_path(&dir, "ratios.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_number(0, 0, 100.0).unwrap();
    sheet.write_formula(1, 0, Formula::new("=A1/0").set_result("42")).unwrap();
    workbook.save(&path).unwrap();

    let report = validate(&path);

    let warning = report
        .issues
        .iter()
        .find(|issue| issue.category == IssueCategory::FormulaQuality)
        .expect("formula quality warning");
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.location, "Sheet1!A2");
    assert_eq!(warning.formula.as_deref(), Some("=A1/0"));

    // a warning alone does not invalidate the file
    assert!(report.is_valid);
    assert_eq!(report.critical_issues, 0);
}

#[test]
fn clean_workbook_scores_high_and_reports_statistics() {
    let dir = TempDir::new().unwrap();
    let path = fixture_path(&dir, "clean.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for row in 0..5u32 {
        sheet.write_number(row, 0, row as f64).unwrap();
        sheet.write_string(row, 1, "ok").unwrap();
    }
    workbook.save(&path).unwrap();

    let report = validate(&path);

    assert!(report.is_valid);
    assert_eq!(report.critical_issues, 0);
    assert_eq!(report.warnings, 0);
    // single info message: zero formula errors detected
    assert_eq!(report.info_messages, 1);
    assert_eq!(report.quality_score, 99);
    assert_eq!(report.summary["numeric_cells"], 5);
    assert_eq!(report.summary["formula_cells"], 0);
}

#[test]
fn sparse_sheet_counts_empty_cells() {
    let dir = TempDir::new().unwrap();
    let path = fixture_path(&dir, "sparse.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_number(0, 0, 1.0).unwrap();
    sheet.write_number(2, 2, 9.0).unwrap();
    workbook.save(&path).unwrap();

    let report = validate(&path);

    // bounding box is 3x3; the seven unwritten cells are empty
    assert_eq!(report.summary["total_cells"], 9);
    assert_eq!(report.summary["empty_cells"], 7);
}

#[test]
fn corrupt_container_short_circuits_with_zero_score() {
    let dir = TempDir::new().unwrap();
    let path = fixture_path(&dir, "broken.xlsx");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let report = validate(&path);

    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert_eq!(report.quality_score, 0);
    assert_eq!(report.issues[0].category, IssueCategory::File);
    assert_eq!(report.issues[0].location, "N/A");
}
