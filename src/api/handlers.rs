use crate::{
    api::models::*,
    core::{
        models::{AppLog, BalanceReport, Expense, Group, Settlement, Transfer, UserSummary},
        services::{GroupStatistics, LedgerService, PaymentHistory},
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use std::sync::Arc;

pub type AppService = Arc<LedgerService<InMemoryLogging, InMemoryStorage>>;

// Define API routes
pub fn api_routes(service: AppService) -> Router {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", post(add_member))
        .route("/groups/{group_id}/members/remove", post(remove_member))
        .route("/groups/{group_id}/strict_mode", post(set_strict_settlement_mode))
        .route("/groups/{group_id}/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/{expense_id}", put(update_expense))
        .route("/expenses/{expense_id}/delete", post(delete_expense))
        .route("/groups/{group_id}/settlements", get(list_settlements))
        .route("/groups/{group_id}/settlements/pending", get(pending_settlements))
        .route("/groups/{group_id}/settlements/suggested", get(suggested_settlements))
        .route("/settlements", post(record_settlement))
        .route("/settlements/confirm", post(confirm_settlement))
        .route("/groups/{group_id}/balances", get(group_balances))
        .route("/groups/{group_id}/statistics", get(group_statistics))
        .route("/members/{member}/summary", get(user_summary))
        .route("/members/{member}/settlements", get(member_settlements))
        .route("/groups/{group_id}/logs", get(get_group_logs))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_group(
    State(service): State<AppService>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(req.name, req.members, &req.created_by).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Group retrieved successfully", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(service.get_group(&group_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    params(("group_id" = String, Path, description = "ID of the group")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member added", body = Group),
        (status = 403, description = "Acting member is not in the group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    )
)]
pub async fn add_member(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.add_member(&group_id, &req.member, &req.acting_member).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members/remove",
    params(("group_id" = String, Path, description = "ID of the group")),
    request_body = MemberRequest,
    responses(
        (status = 200, description = "Member removed", body = Group),
        (status = 400, description = "Cannot remove last member", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 409, description = "Member has an outstanding balance", body = ErrorResponse)
    )
)]
pub async fn remove_member(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service.remove_member(&group_id, &req.member, &req.acting_member).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/strict_mode",
    params(("group_id" = String, Path, description = "ID of the group")),
    request_body = ToggleStrictModeRequest,
    responses(
        (status = 200, description = "Settlement mode updated", body = Group),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
pub async fn set_strict_settlement_mode(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<ToggleStrictModeRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = service
        .set_strict_settlement_mode(&group_id, req.enabled, &req.toggled_by)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "ID of the group")),
    request_body = ExpenseRequest,
    responses(
        (status = 201, description = "Expense added", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn add_expense(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
    Json(req): Json<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let (expense, created_by) = req.into_parts();
    let expense = service.add_expense(&group_id, expense, &created_by).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Expenses, newest first", body = Vec<Expense>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn list_expenses(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    Ok(Json(service.list_expenses(&group_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    request_body = ExpenseRequest,
    responses(
        (status = 200, description = "Expense replaced", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn update_expense(
    State(service): State<AppService>,
    Path(expense_id): Path<String>,
    Json(req): Json<ExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    let (expense, updated_by) = req.into_parts();
    Ok(Json(service.update_expense(&expense_id, expense, &updated_by).await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses/{expense_id}/delete",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    request_body = DeleteExpenseRequest,
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn delete_expense(
    State(service): State<AppService>,
    Path(expense_id): Path<String>,
    Json(req): Json<DeleteExpenseRequest>,
) -> Result<StatusCode, ApiError> {
    service.delete_expense(&expense_id, &req.deleted_by).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/settlements",
    request_body = RecordSettlementRequest,
    responses(
        (status = 201, description = "Settlement recorded", body = Settlement),
        (status = 400, description = "Self settlement or invalid amount", body = ErrorResponse),
        (status = 403, description = "Party is not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn record_settlement(
    State(service): State<AppService>,
    Json(req): Json<RecordSettlementRequest>,
) -> Result<(StatusCode, Json<Settlement>), ApiError> {
    let settlement = service
        .record_settlement(&req.group_id, &req.from, &req.to, req.amount, req.remarks, &req.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

#[utoipa::path(
    post,
    path = "/api/settlements/confirm",
    request_body = ConfirmSettlementRequest,
    responses(
        (status = 200, description = "Settlement completed", body = Settlement),
        (status = 403, description = "Only the recipient may confirm", body = ErrorResponse),
        (status = 404, description = "Settlement not found", body = ErrorResponse),
        (status = 409, description = "Settlement already confirmed", body = ErrorResponse)
    )
)]
pub async fn confirm_settlement(
    State(service): State<AppService>,
    Json(req): Json<ConfirmSettlementRequest>,
) -> Result<Json<Settlement>, ApiError> {
    let settlement = service.confirm_settlement(&req.settlement_id, &req.confirmed_by).await?;
    Ok(Json(settlement))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settlements",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Recorded settlements", body = Vec<Settlement>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn list_settlements(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    Ok(Json(service.list_settlements(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settlements/pending",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Settlements awaiting confirmation", body = Vec<Settlement>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn pending_settlements(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    Ok(Json(service.pending_settlements(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settlements/suggested",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Transfers still needed to settle the group", body = Vec<Transfer>),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 422, description = "Balances do not sum to zero", body = ErrorResponse)
    )
)]
pub async fn suggested_settlements(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Transfer>>, ApiError> {
    Ok(Json(service.suggested_settlements(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Member balances with data warnings", body = BalanceReport),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn group_balances(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<BalanceReport>, ApiError> {
    Ok(Json(service.group_balances(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/statistics",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Spending totals", body = GroupStatistics),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn group_statistics(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupStatistics>, ApiError> {
    Ok(Json(service.group_statistics(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/members/{member}/summary",
    params(("member" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Totals across all of the member's groups", body = UserSummary)
    )
)]
pub async fn user_summary(
    State(service): State<AppService>,
    Path(member): Path<String>,
) -> Result<Json<UserSummary>, ApiError> {
    Ok(Json(service.user_summary(&member).await?))
}

#[utoipa::path(
    get,
    path = "/api/members/{member}/settlements",
    params(("member" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Settlements paid or received by the member", body = PaymentHistory)
    )
)]
pub async fn member_settlements(
    State(service): State<AppService>,
    Path(member): Path<String>,
) -> Result<Json<PaymentHistory>, ApiError> {
    Ok(Json(service.member_settlements(&member).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Audit trail of ledger actions", body = Vec<AppLog>)
    )
)]
pub async fn get_app_logs(State(service): State<AppService>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/logs",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Audit trail for one group", body = Vec<AppLog>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_group_logs(
    State(service): State<AppService>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_group_logs(&group_id).await?))
}
