use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::LedgerError;
use crate::core::models::{NewExpense, SplitSpec};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub members: Vec<String>,
    pub created_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct MemberRequest {
    pub member: String,
    pub acting_member: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ToggleStrictModeRequest {
    pub enabled: bool,
    pub toggled_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ExpenseRequest {
    pub description: String,
    pub category: Option<String>,
    pub memo: Option<String>,
    pub amount: f64,
    pub paid_by: String,
    pub split: SplitSpec,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    /// Member performing the change.
    pub acting_member: String,
}

impl ExpenseRequest {
    pub fn into_parts(self) -> (NewExpense, String) {
        (
            NewExpense {
                description: self.description,
                category: self.category,
                memo: self.memo,
                amount: self.amount,
                paid_by: self.paid_by,
                split: self.split,
                date: self.date,
            },
            self.acting_member,
        )
    }
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteExpenseRequest {
    pub deleted_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub group_id: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub remarks: Option<String>,
    pub created_by: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ConfirmSettlementRequest {
    pub settlement_id: String,
    pub confirmed_by: String,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            LedgerError::GroupNotFound(_) | LedgerError::ExpenseNotFound(_) | LedgerError::SettlementNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            LedgerError::NotGroupMember(_) | LedgerError::UnauthorizedSettlementConfirmation(_) => {
                StatusCode::FORBIDDEN
            }
            LedgerError::AlreadyGroupMember(_)
            | LedgerError::SettlementAlreadyConfirmed(_)
            | LedgerError::OutstandingBalance { .. } => StatusCode::CONFLICT,
            LedgerError::CannotRemoveLastMember
            | LedgerError::InvalidSplit { .. }
            | LedgerError::InvalidSplitUser(_)
            | LedgerError::SelfSettlement
            | LedgerError::InvalidInput(..)
            | LedgerError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            LedgerError::ConservationViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::StorageError(_) | LedgerError::LoggingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error = match self.0 {
            LedgerError::InvalidInput(field, detail) => format!("Invalid input for {}: {}", field, detail.description),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
