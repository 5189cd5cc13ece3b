use utoipa::OpenApi;

use crate::{
    api::models::{
        ConfirmSettlementRequest, CreateGroupRequest, DeleteExpenseRequest, ErrorResponse, ExpenseRequest,
        MemberRequest, RecordSettlementRequest, ToggleStrictModeRequest,
    },
    core::{
        models::{
            AppLog, BalanceMap, BalanceReport, DataInconsistency, Expense, Group, Settlement, SettlementStatus,
            SplitSpec, Transfer, UserSummary,
        },
        services::{GroupStatistics, PayerTotal, PaymentHistory},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::get_group,
        super::handlers::add_member,
        super::handlers::remove_member,
        super::handlers::set_strict_settlement_mode,
        super::handlers::add_expense,
        super::handlers::list_expenses,
        super::handlers::update_expense,
        super::handlers::delete_expense,
        super::handlers::record_settlement,
        super::handlers::confirm_settlement,
        super::handlers::list_settlements,
        super::handlers::pending_settlements,
        super::handlers::suggested_settlements,
        super::handlers::group_balances,
        super::handlers::group_statistics,
        super::handlers::user_summary,
        super::handlers::member_settlements,
        super::handlers::get_group_logs,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        MemberRequest,
        ToggleStrictModeRequest,
        ExpenseRequest,
        DeleteExpenseRequest,
        RecordSettlementRequest,
        ConfirmSettlementRequest,
        ErrorResponse,
        Group,
        Expense,
        SplitSpec,
        Settlement,
        SettlementStatus,
        Transfer,
        BalanceMap,
        BalanceReport,
        DataInconsistency,
        UserSummary,
        GroupStatistics,
        PayerTotal,
        PaymentHistory,
        AppLog
    )),
    info(
        title = "Splitledger API",
        description = "Shared expense balances and settlement planning",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
