pub mod clean;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod profile;
pub mod report;
pub mod schema;

pub use clean::clean_dataset;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use dataset::{CellValue, Dataset};
pub use metrics::{compute_metrics, PipelineMetrics, CLOSED_LOST_STAGES, CLOSED_WON_STAGES};
pub use profile::{profile_dataset, ColumnKind, DatasetProfile};
pub use report::{FileType, IssueCategory, Severity, ValidationIssue, ValidationReport};
pub use schema::{detect_schema, CrmField, CrmSchema};
