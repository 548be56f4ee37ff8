//! End-to-end PDF scans over documents synthesized with lopdf.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use dealiq_core::report::{FileType, IssueCategory, Severity};
use dealiq_validator::validate;

/// Build a single-page PDF whose page shows `text`.
fn write_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn content_rich_pdf_is_valid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.pdf");
    let body = "Quarterly pipeline review: total pipeline value grew 14 percent, \
                win rate held at 31 percent, and average sales cycle shortened to 42 days.";
    write_pdf(&path, body);

    let report = validate(&path);

    assert_eq!(report.file_type, FileType::Pdf);
    assert!(report.is_valid);
    assert_eq!(report.critical_issues, 0);
    assert_eq!(report.warnings, 0);
    // info: one page generated, content volume extracted
    assert_eq!(report.info_messages, 2);
    assert_eq!(report.quality_score, 98);
    assert_eq!(report.summary["total_pages"], 1);
    assert!(report.summary["total_characters"].as_u64().unwrap() > 100);
}

#[test]
fn near_empty_page_is_flagged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("thin.pdf");
    write_pdf(&path, "hi");

    let report = validate(&path);

    // page-level emptiness and document-level low content, both warnings
    assert!(report.is_valid);
    let page_warning = report
        .issues
        .iter()
        .find(|issue| issue.location == "Page 1")
        .expect("page warning");
    assert_eq!(page_warning.severity, Severity::Warning);
    assert_eq!(page_warning.category, IssueCategory::Content);

    assert!(report
        .issues
        .iter()
        .any(|issue| issue.location == "Document"
            && issue.severity == Severity::Warning
            && issue.category == IssueCategory::Content));
    // 2 warnings + 1 info (page count)
    assert_eq!(report.quality_score, 89);
}

#[test]
fn empty_page_tree_is_a_critical_content_issue() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.pdf");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path).unwrap();

    let report = validate(&path);

    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert_eq!(report.summary["total_pages"], 0);
    let issue = report
        .issues
        .iter()
        .find(|issue| issue.category == IssueCategory::Content && issue.severity == Severity::Critical)
        .expect("critical content issue");
    assert_eq!(issue.location, "Document");
    assert_eq!(report.quality_score, 40);
}

#[test]
fn unreadable_page_content_degrades_to_a_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("torn.pdf");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    // Contents references an object id that is never allocated, so text
    // extraction for the page fails while the document itself loads
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => Object::Reference((9999, 0)),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(&path).unwrap();

    let report = validate(&path);

    // one bad page is a warning, never a scan abort
    assert!(report.is_valid);
    assert_eq!(report.critical_issues, 0);
    let warning = report
        .issues
        .iter()
        .find(|issue| issue.category == IssueCategory::Extraction)
        .expect("extraction warning");
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.location, "Page 1");
}

#[test]
fn garbage_bytes_short_circuit_with_zero_score() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"not a pdf at all").unwrap();

    let report = validate(&path);

    assert_eq!(report.file_type, FileType::Pdf);
    assert!(!report.is_valid);
    assert_eq!(report.critical_issues, 1);
    assert_eq!(report.quality_score, 0);
    assert_eq!(report.issues[0].category, IssueCategory::File);
}

#[test]
fn summary_reports_size_and_metadata_presence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.pdf");
    write_pdf(&path, "A short but sufficient line of body text for the summary page of this document.");

    let report = validate(&path);

    assert!(report.summary["file_size_kb"].as_f64().unwrap() > 0.0);
    // no Info dictionary is written by the fixture
    assert_eq!(report.summary["has_metadata"], false);
    assert_eq!(report.summary["total_pages"], 1);
}
