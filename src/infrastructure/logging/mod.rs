pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        group_id: Option<&str>,
        member: Option<&str>,
    ) -> Result<(), LedgerError>;
    /// Audit records in insertion order, optionally limited to one group.
    async fn get_logs(&self, group_id: Option<&str>) -> Result<Vec<AppLog>, LedgerError>;
}
