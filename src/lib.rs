pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::LedgerError;
pub use crate::core::ledger::{
    aggregate_user_balances, compute_group_balances, compute_ledger_balances, filter_new_settlements,
    plan_settlements, split_equally,
};
pub use crate::core::services::LedgerService;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
