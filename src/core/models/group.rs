use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A set of members sharing expenses. Members are identified by a stable
/// opaque string (an email address in practice) used for every split and
/// settlement in the group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub strict_settlement_mode: bool,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}
