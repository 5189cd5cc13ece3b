use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// A recorded payment from one member to another. Settlements are only ever
/// appended; confirming one flips it from pending to completed.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Settlement {
    pub id: String,
    pub group_id: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub remarks: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    pub status: SettlementStatus,
    pub confirmed_by: Option<String>,
}

impl Settlement {
    pub fn is_completed(&self) -> bool {
        self.status == SettlementStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == SettlementStatus::Pending
    }
}
