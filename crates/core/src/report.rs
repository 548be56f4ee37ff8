//! Validation report model shared by the workbook and document validators.
//!
//! A report is built incrementally while a file is scanned: `add_issue` is
//! the only mutator, keeping the severity counters and the validity flag in
//! lock-step with the issue list. The quality score is derived from the
//! counters at the end of a run, never stored independently.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Severity of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Invalidates the file: a deliverable with any critical issue fails.
    Critical,
    /// Worth reviewing but does not invalidate the file.
    Warning,
    /// Informational note, including positive quality signals.
    Info,
}

/// Category tag for a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// File-level failure: missing, unreadable, or unsupported file.
    File,
    /// A spreadsheet error code observed in a computed cell value.
    FormulaError,
    /// A formula that parses but carries a structural risk.
    FormulaQuality,
    /// Document content problems (empty pages, thin text).
    Content,
    /// Per-page text extraction failure.
    Extraction,
    /// Data-level quality finding.
    DataQuality,
    /// Positive or neutral quality observation.
    Quality,
    /// Unexpected internal failure converted into a structured issue.
    Error,
}

/// Kind of file a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Excel,
    Pdf,
    Unknown,
}

/// One defect (or observation) discovered while validating a file.
///
/// Immutable once constructed; owned by the report that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    /// `Sheet!B5`, `Page 3`, or `N/A` for file-level findings.
    pub location: String,
    pub message: String,
    /// The offending cell value, if one exists.
    pub value: Option<String>,
    /// Raw formula text, if the finding concerns a formula cell.
    pub formula: Option<String>,
    /// Remediation hint.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            location: location.into(),
            message: message.into(),
            value: None,
            formula: None,
            suggestion: None,
        }
    }

    pub fn critical(
        category: IssueCategory,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Critical, category, location, message)
    }

    pub fn warning(
        category: IssueCategory,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, category, location, message)
    }

    pub fn info(
        category: IssueCategory,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, category, location, message)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Aggregate result of validating one deliverable file.
///
/// The serialized JSON shape is a published contract parsed by external
/// tooling; field names and the issue sub-shape must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub file_path: String,
    pub file_type: FileType,
    pub is_valid: bool,
    pub quality_score: u8,
    pub total_issues: u64,
    pub critical_issues: u64,
    pub warnings: u64,
    pub info_messages: u64,
    /// Discovery order is preserved.
    pub issues: Vec<ValidationIssue>,
    /// Free-form scan statistics (cell counts, page counts, ...).
    pub summary: BTreeMap<String, serde_json::Value>,
}

impl ValidationReport {
    /// Create an empty, valid report for a file about to be scanned.
    pub fn new(file_path: impl AsRef<Path>, file_type: FileType) -> Self {
        Self {
            file_path: file_path.as_ref().display().to_string(),
            file_type,
            is_valid: true,
            quality_score: 100,
            total_issues: 0,
            critical_issues: 0,
            warnings: 0,
            info_messages: 0,
            issues: Vec::new(),
            summary: BTreeMap::new(),
        }
    }

    /// Append an issue, updating the counters and validity flag together.
    ///
    /// A critical issue flips `is_valid` to false permanently; no operation
    /// resets it.
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.total_issues += 1;
        match issue.severity {
            Severity::Critical => {
                self.critical_issues += 1;
                self.is_valid = false;
            }
            Severity::Warning => self.warnings += 1,
            Severity::Info => self.info_messages += 1,
        }
        self.issues.push(issue);
    }

    /// Record a free-form summary statistic.
    pub fn record_summary(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.summary.insert(key.into(), value);
    }

    /// Derive the 0-100 quality score from the issue counters.
    ///
    /// Critical issues are punishing: any critical defect caps the score at
    /// 40 (`50 - 10` per critical). Without criticals, warnings cost 5 points
    /// and info messages 1, from a base of 100. Always clamped to [0, 100].
    pub fn finalize_quality_score(&mut self) {
        let base = if self.critical_issues > 0 {
            50 - 10 * self.critical_issues as i64
        } else {
            100 - 5 * self.warnings as i64 - self.info_messages as i64
        };
        self.quality_score = base.clamp(0, 100) as u8;
    }

    /// Mark the report as a file-level failure: a single critical finding
    /// and a pinned zero score, skipping the usual score formula.
    pub fn fail_file(&mut self, issue: ValidationIssue) {
        self.add_issue(issue);
        self.quality_score = 0;
    }
}
