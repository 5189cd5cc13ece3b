use crate::core::errors::LedgerError;
use crate::core::models::{Expense, Group, Settlement};
use crate::infrastructure::storage::{Storage, StoreEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

const EVENT_BUFFER: usize = 256;

#[derive(Clone)]
pub struct InMemoryStorage {
    groups: Arc<RwLock<HashMap<String, Group>>>,
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    settlements: Arc<RwLock<Vec<Settlement>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        InMemoryStorage {
            groups: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    fn notify(&self, group_id: &str) {
        // no receivers is fine: nobody is watching yet
        let _ = self.events.send(StoreEvent {
            group_id: group_id.to_string(),
        });
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        let group_id = group.id.clone();
        self.groups.write().await.insert(group_id.clone(), group);
        self.notify(&group_id);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn get_member_groups(&self, member: &str) -> Result<Vec<Group>, LedgerError> {
        let groups = self.groups.read().await;
        let mut found: Vec<Group> = groups.values().filter(|g| g.is_member(member)).cloned().collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), LedgerError> {
        let group_id = expense.group_id.clone();
        self.expenses.write().await.insert(expense.id.clone(), expense);
        self.notify(&group_id);
        Ok(())
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>, LedgerError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.get(expense_id).cloned())
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<Option<Expense>, LedgerError> {
        let removed = self.expenses.write().await.remove(expense_id);
        if let Some(ref expense) = removed {
            self.notify(&expense.group_id);
        }
        Ok(removed)
    }

    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, LedgerError> {
        let expenses = self.expenses.read().await;
        let mut found: Vec<Expense> = expenses.values().filter(|e| e.group_id == group_id).cloned().collect();
        found.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), LedgerError> {
        let group_id = settlement.group_id.clone();
        {
            let mut settlements = self.settlements.write().await;
            match settlements.iter_mut().find(|s| s.id == settlement.id) {
                Some(existing) => *existing = settlement,
                None => settlements.push(settlement),
            }
        }
        self.notify(&group_id);
        Ok(())
    }

    async fn get_settlement(&self, settlement_id: &str) -> Result<Option<Settlement>, LedgerError> {
        let settlements = self.settlements.read().await;
        Ok(settlements.iter().find(|s| s.id == settlement_id).cloned())
    }

    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, LedgerError> {
        let settlements = self.settlements.read().await;
        Ok(settlements.iter().filter(|s| s.group_id == group_id).cloned().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
