//! Extension dispatch and report persistence.

use tempfile::TempDir;

use dealiq_core::report::{FileType, IssueCategory};
use dealiq_validator::{validate, ReportStore};

#[test]
fn missing_file_reports_single_critical_and_zero_score() {
    let report = validate("no/such/output.xlsx");

    assert_eq!(report.file_type, FileType::Unknown);
    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert_eq!(report.total_issues, 1);
    assert_eq!(report.quality_score, 0);
    assert_eq!(report.issues[0].category, IssueCategory::File);
    assert_eq!(report.issues[0].location, "N/A");
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.docx");
    std::fs::write(&path, b"binary").unwrap();

    let report = validate(&path);

    assert_eq!(report.file_type, FileType::Unknown);
    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert_eq!(report.quality_score, 0);
    assert!(report.issues[0].message.contains(".docx"));
}

#[test]
fn extension_dispatch_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upper.XLSX");
    std::fs::write(&path, b"not a workbook").unwrap();

    // dispatched to the workbook path, which rejects the broken container
    let report = validate(&path);
    assert_eq!(report.file_type, FileType::Excel);
}

#[test]
fn persisted_report_round_trips_the_json_contract() {
    let dir = TempDir::new().unwrap();
    let report = validate("no/such/output.xlsx");

    let store = ReportStore::new(dir.path().join("reports"));
    let stored = store.persist(&report).unwrap();
    assert!(stored.path.ends_with(format!("{}.json", stored.task_id)));

    let raw = std::fs::read_to_string(&stored.path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    for key in [
        "file_path",
        "file_type",
        "is_valid",
        "quality_score",
        "total_issues",
        "critical_issues",
        "warnings",
        "info_messages",
        "issues",
        "summary",
    ] {
        assert!(json.get(key).is_some(), "missing contract key `{key}`");
    }
    assert_eq!(json["file_type"], "unknown");
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["issues"][0]["severity"], "critical");
    assert_eq!(json["issues"][0]["category"], "file");
    // optional issue fields serialize as null, not absent
    assert!(json["issues"][0]["value"].is_null());
    assert!(json["issues"][0].get("formula").is_some());
}

#[test]
fn distinct_validations_never_collide_in_the_store() {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::new(dir.path());
    let report = validate("no/such/output.pdf");

    let first = store.persist(&report).unwrap();
    let second = store.persist(&report).unwrap();
    assert_ne!(first.task_id, second.task_id);
    assert_ne!(first.path, second.path);
    assert!(first.path.exists() && second.path.exists());
}
