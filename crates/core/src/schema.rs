//! CRM schema detection over arbitrary tabular exports.
//!
//! Columns are mapped onto canonical CRM field roles by case-insensitive
//! substring keyword matching. Detection is first-match-wins per field:
//! fields are evaluated in a fixed order, and within a field the first
//! column (in dataset order) containing any keyword is assigned. Overlapping
//! keyword sets (`id` matches both `Deal ID` and `Campaign ID`) are a known
//! limitation of this model and are deliberately not disambiguated further,
//! since callers depend on the observable assignment order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Canonical CRM field roles that export columns are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrmField {
    DealId,
    DealName,
    Amount,
    Stage,
    CloseDate,
    CreatedDate,
    Owner,
    Account,
    Probability,
    Source,
}

impl CrmField {
    /// Evaluation order for detection. Earlier fields claim ambiguous
    /// columns first.
    pub const ALL: [CrmField; 10] = [
        Self::DealId,
        Self::DealName,
        Self::Amount,
        Self::Stage,
        Self::CloseDate,
        Self::CreatedDate,
        Self::Owner,
        Self::Account,
        Self::Probability,
        Self::Source,
    ];

    /// Keyword synonyms matched (lowercased, substring) against column names.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::DealId => &["deal_id", "opportunity_id", "opp_id", "deal", "id"],
            Self::DealName => &["deal_name", "opportunity_name", "opp_name", "name", "title"],
            Self::Amount => &["amount", "value", "deal_value", "revenue", "price", "arr", "mrr"],
            Self::Stage => &["stage", "deal_stage", "status", "pipeline_stage", "phase"],
            Self::CloseDate => &["close_date", "closed_date", "expected_close", "closing_date"],
            Self::CreatedDate => &["created_date", "created_at", "creation_date", "opened_date"],
            Self::Owner => &["owner", "sales_rep", "assigned_to", "account_executive", "ae"],
            Self::Account => &["account", "company", "customer", "client", "organization"],
            Self::Probability => &["probability", "win_probability", "likelihood", "confidence"],
            Self::Source => &["source", "lead_source", "origin", "channel"],
        }
    }

    /// Canonical snake_case name, as used in serialized schema maps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DealId => "deal_id",
            Self::DealName => "deal_name",
            Self::Amount => "amount",
            Self::Stage => "stage",
            Self::CloseDate => "close_date",
            Self::CreatedDate => "created_date",
            Self::Owner => "owner",
            Self::Account => "account",
            Self::Probability => "probability",
            Self::Source => "source",
        }
    }
}

/// Mapping from canonical CRM field to the actual column name in a dataset.
///
/// Ephemeral derived artifact: recomputed per analysis request, never
/// persisted. Values are always real column names of the source dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrmSchema {
    fields: BTreeMap<CrmField, String>,
}

impl CrmSchema {
    pub fn get(&self, field: CrmField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CrmField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CrmField, &str)> {
        self.fields.iter().map(|(field, column)| (*field, column.as_str()))
    }
}

/// Detect canonical CRM fields in a dataset's columns.
///
/// First-match-wins per field; fields with no matching column are simply
/// absent from the result.
pub fn detect_schema(dataset: &Dataset) -> CrmSchema {
    let lowered: Vec<String> =
        dataset.columns().iter().map(|c| c.to_lowercase()).collect();

    let mut schema = CrmSchema::default();
    for field in CrmField::ALL {
        let keywords = field.keywords();
        let hit = lowered
            .iter()
            .position(|col| keywords.iter().any(|keyword| col.contains(keyword)));
        if let Some(idx) = hit {
            schema.fields.insert(field, dataset.columns()[idx].clone());
        }
    }

    tracing::debug!(
        fields_detected = schema.len(),
        total_columns = dataset.column_count(),
        "crm schema detection complete"
    );
    schema
}
