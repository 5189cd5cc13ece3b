mod api_tests;

use crate::core::models::{Expense, Settlement, SettlementStatus};
use crate::core::services::LedgerService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::Utc;

pub fn create_test_service(strict: bool) -> LedgerService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    LedgerService::new(storage, logging, strict)
}

pub fn members(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

pub fn expense(id: &str, paid_by: &str, amount: f64, splits: &[(&str, f64)]) -> Expense {
    let now = Utc::now();
    Expense {
        id: id.to_string(),
        group_id: "g1".to_string(),
        description: format!("expense {}", id),
        category: None,
        memo: None,
        amount,
        paid_by: paid_by.to_string(),
        splits: splits.iter().map(|(m, s)| (m.to_string(), *s)).collect(),
        date: now,
        created_at: now,
    }
}

pub fn settlement(id: &str, from: &str, to: &str, amount: f64, status: SettlementStatus) -> Settlement {
    Settlement {
        id: id.to_string(),
        group_id: "g1".to_string(),
        from: from.to_string(),
        to: to.to_string(),
        amount,
        remarks: None,
        date: Utc::now(),
        status,
        confirmed_by: None,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {} to be within 0.01 of {}",
        actual,
        expected
    );
}
