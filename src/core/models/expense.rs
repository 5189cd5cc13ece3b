use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A shared cost paid by one member and split across members of the group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub category: Option<String>,
    pub memo: Option<String>,
    pub amount: f64,
    pub paid_by: String,
    pub splits: BTreeMap<String, f64>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn split_total(&self) -> f64 {
        self.splits.values().sum()
    }
}

/// How an expense should be divided when it is logged.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SplitSpec {
    /// Divide the amount evenly over every current group member.
    Equal,
    Manual(BTreeMap<String, f64>),
}

/// Caller-supplied fields for creating or replacing an expense.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub category: Option<String>,
    pub memo: Option<String>,
    pub amount: f64,
    pub paid_by: String,
    pub split: SplitSpec,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
}
