//! Pipeline metrics computed from a cleaned dataset and its schema.
//!
//! Every metric is computed independently and appears in the output only
//! when its required schema fields are mapped and its inputs are non-empty.
//! A partial schema yields a partial metric set; zero-count denominators
//! suppress a metric entirely rather than producing NaN or infinity.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{CellValue, Dataset};
use crate::schema::{CrmField, CrmSchema};

/// Stage values (lowercased, exact match) counted as a won deal.
pub const CLOSED_WON_STAGES: [&str; 4] = ["closed won", "won", "closed-won", "success"];

/// Stage values (lowercased, exact match) counted as a lost deal.
pub const CLOSED_LOST_STAGES: [&str; 4] = ["closed lost", "lost", "closed-lost", "failed"];

/// Aggregate sales metrics. Absent metrics serialize as absent keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pipeline_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_deal_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_deal_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals_by_stage: Option<BTreeMap<String, u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_sales_cycle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_sales_cycle: Option<f64>,
}

/// Compute pipeline metrics from a cleaned dataset.
pub fn compute_metrics(dataset: &Dataset, schema: &CrmSchema) -> PipelineMetrics {
    let mut metrics = PipelineMetrics::default();

    if let Some(amount_col) = schema.get(CrmField::Amount) {
        let amounts: Vec<f64> =
            dataset.column_values(amount_col).filter_map(CellValue::as_number).collect();
        metrics.total_pipeline_value = Some(amounts.iter().sum());
        metrics.average_deal_size = mean(&amounts);
        metrics.median_deal_size = median(&amounts);
    }

    if let Some(stage_col) = schema.get(CrmField::Stage) {
        let mut by_stage: BTreeMap<String, u64> = BTreeMap::new();
        let mut won = 0u64;
        let mut lost = 0u64;
        for stage in dataset.column_values(stage_col).filter_map(CellValue::as_text) {
            *by_stage.entry(stage.to_string()).or_insert(0) += 1;
            let lowered = stage.to_lowercase();
            if CLOSED_WON_STAGES.contains(&lowered.as_str()) {
                won += 1;
            } else if CLOSED_LOST_STAGES.contains(&lowered.as_str()) {
                lost += 1;
            }
        }
        metrics.deals_by_stage = Some(by_stage);
        if won + lost > 0 {
            metrics.win_rate = Some(won as f64 / (won + lost) as f64);
        }
    }

    if let (Some(created_col), Some(close_col)) =
        (schema.get(CrmField::CreatedDate), schema.get(CrmField::CloseDate))
    {
        let cycles = sales_cycles(dataset, created_col, close_col);
        metrics.average_sales_cycle = mean(&cycles);
        metrics.median_sales_cycle = median(&cycles);
    }

    metrics
}

/// Cycle length in whole days for each row with both dates present.
fn sales_cycles(dataset: &Dataset, created_col: &str, close_col: &str) -> Vec<f64> {
    let (Some(created_idx), Some(close_idx)) =
        (dataset.column_index(created_col), dataset.column_index(close_col))
    else {
        return Vec::new();
    };

    dataset
        .rows()
        .iter()
        .filter_map(|row| {
            let close = row[close_idx].as_date()?;
            let created = row[created_idx].as_date()?;
            Some(close.signed_duration_since(created).num_days() as f64)
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
