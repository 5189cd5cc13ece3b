pub mod audit;
pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;

pub use audit::AppLog;
pub use balance::{BalanceMap, BalanceReport, DataInconsistency, Transfer, UserSummary};
pub use expense::{Expense, NewExpense, SplitSpec};
pub use group::Group;
pub use settlement::{Settlement, SettlementStatus};
