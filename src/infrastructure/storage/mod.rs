use crate::core::errors::LedgerError;
use crate::core::models::{Expense, Group, Settlement};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Emitted by a store after every write so watchers can recompute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreEvent {
    pub group_id: String,
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError>;
    async fn get_member_groups(&self, member: &str) -> Result<Vec<Group>, LedgerError>;
    async fn save_expense(&self, expense: Expense) -> Result<(), LedgerError>;
    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, LedgerError>;
    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>, LedgerError>;
    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, LedgerError>;
    async fn save_settlement(&self, settlement: Settlement) -> Result<(), LedgerError>;
    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, LedgerError>;
    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, LedgerError>;
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

pub mod in_memory;
