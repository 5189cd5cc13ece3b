use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Expense with given ID not found
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    /// Settlement with given ID not found
    #[error("Settlement {0} not found")]
    SettlementNotFound(String),

    /// Member is not part of the group
    #[error("Member {0} is not a group member")]
    NotGroupMember(String),

    /// Member is already part of the group
    #[error("Member {0} is already a group member")]
    AlreadyGroupMember(String),

    #[error("Cannot remove last group member")]
    CannotRemoveLastMember,

    /// Member still owes or is owed money in the group
    #[error("Member {member} has an outstanding balance of {balance:.2}")]
    OutstandingBalance { member: String, balance: f64 },

    /// Manual split amounts don't add up to the expense amount
    #[error("Invalid split amounts: shares total {split_total:.2}, expected {amount:.2}")]
    InvalidSplit { amount: f64, split_total: f64 },

    /// Member named in a split is not part of the group
    #[error("Invalid split member: {0}")]
    InvalidSplitUser(String),

    #[error("Cannot create settlement to self")]
    SelfSettlement,

    #[error("Settlement {0} already confirmed")]
    SettlementAlreadyConfirmed(String),

    /// Only the recipient of a settlement may confirm it
    #[error("Member {0} not authorized to confirm settlement")]
    UnauthorizedSettlementConfirmation(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// Computation requested over an impossible configuration, e.g. splitting over nobody
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Balances do not sum to zero, so no settlement plan can be trusted
    #[error("Balances do not sum to zero (imbalance {imbalance:.4})")]
    ConservationViolation { imbalance: f64 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}

impl LedgerError {
    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
