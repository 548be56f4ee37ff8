//! Flat-file persistence for finalized validation reports.
//!
//! Each report is written once under a fresh task identifier; concurrent
//! validations therefore never contend for the same file. Reports are never
//! mutated after persistence.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use dealiq_core::report::ValidationReport;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create reports directory `{path}`: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("could not write report `{path}`: {source}")]
    WriteReport { path: PathBuf, source: std::io::Error },
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to a persisted report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub task_id: Uuid,
    pub path: PathBuf,
}

/// Writes validation reports as `<task_id>.json` under a reports directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self { reports_dir: reports_dir.into() }
    }

    pub fn persist(&self, report: &ValidationReport) -> Result<StoredReport, StoreError> {
        fs::create_dir_all(&self.reports_dir).map_err(|source| StoreError::CreateDir {
            path: self.reports_dir.clone(),
            source,
        })?;

        let task_id = Uuid::new_v4();
        let path = self.reports_dir.join(format!("{task_id}.json"));
        let payload = serde_json::to_vec_pretty(report)?;
        fs::write(&path, payload)
            .map_err(|source| StoreError::WriteReport { path: path.clone(), source })?;

        tracing::info!(
            task_id = %task_id,
            file_path = %report.file_path,
            quality_score = report.quality_score,
            is_valid = report.is_valid,
            "validation report persisted"
        );
        Ok(StoredReport { task_id, path })
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }
}
