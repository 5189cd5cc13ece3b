use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::api::handlers::{
    AppService, add_expense, confirm_settlement, create_group, group_balances, record_settlement,
    suggested_settlements,
};
use crate::api::models::{
    ApiError, ConfirmSettlementRequest, CreateGroupRequest, ExpenseRequest, RecordSettlementRequest,
};
use crate::core::errors::LedgerError;
use crate::core::models::{SplitSpec, Transfer};
use crate::tests::{assert_close, create_test_service, members};

fn app_service() -> AppService {
    Arc::new(create_test_service(true))
}

#[test]
fn test_error_status_codes() {
    let cases = vec![
        (LedgerError::GroupNotFound("g".into()), StatusCode::NOT_FOUND),
        (LedgerError::NotGroupMember("m".into()), StatusCode::FORBIDDEN),
        (
            LedgerError::UnauthorizedSettlementConfirmation("m".into()),
            StatusCode::FORBIDDEN,
        ),
        (LedgerError::SettlementAlreadyConfirmed("s".into()), StatusCode::CONFLICT),
        (LedgerError::SelfSettlement, StatusCode::BAD_REQUEST),
        (
            LedgerError::invalid_input("amount", "Invalid Amount", "too small"),
            StatusCode::BAD_REQUEST,
        ),
        (
            LedgerError::ConservationViolation { imbalance: 1.0 },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (LedgerError::StorageError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        let response = ApiError(error).into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_handlers_drive_settlement_flow() {
    let service = app_service();

    let (status, Json(group)) = create_group(
        State(service.clone()),
        Json(CreateGroupRequest {
            name: "Flat".to_string(),
            members: members(&["B", "C"]),
            created_by: "A".to_string(),
        }),
    )
    .await
    .unwrap_or_else(|_| panic!("group creation failed"));
    assert_eq!(status, StatusCode::CREATED);

    let request = ExpenseRequest {
        description: "Groceries".to_string(),
        category: Some("food".to_string()),
        memo: None,
        amount: 90.0,
        paid_by: "A".to_string(),
        split: SplitSpec::Equal,
        date: None,
        acting_member: "A".to_string(),
    };
    let result = add_expense(State(service.clone()), Path(group.id.clone()), Json(request)).await;
    assert!(result.is_ok());

    let Json(suggestions) = suggested_settlements(State(service.clone()), Path(group.id.clone()))
        .await
        .unwrap_or_else(|_| panic!("suggestions failed"));
    assert_eq!(
        suggestions,
        vec![Transfer::new("B", "A", 30.0), Transfer::new("C", "A", 30.0)]
    );

    let (_, Json(settlement)) = record_settlement(
        State(service.clone()),
        Json(RecordSettlementRequest {
            group_id: group.id.clone(),
            from: "B".to_string(),
            to: "A".to_string(),
            amount: 30.0,
            remarks: None,
            created_by: "B".to_string(),
        }),
    )
    .await
    .unwrap_or_else(|_| panic!("settlement failed"));

    let rejected = confirm_settlement(
        State(service.clone()),
        Json(ConfirmSettlementRequest {
            settlement_id: settlement.id.clone(),
            confirmed_by: "C".to_string(),
        }),
    )
    .await;
    match rejected {
        Err(err) => assert_eq!(err.status(), StatusCode::FORBIDDEN),
        Ok(_) => panic!("only the recipient may confirm"),
    }

    let confirmed = confirm_settlement(
        State(service.clone()),
        Json(ConfirmSettlementRequest {
            settlement_id: settlement.id,
            confirmed_by: "A".to_string(),
        }),
    )
    .await;
    assert!(confirmed.is_ok());

    let Json(report) = group_balances(State(service), Path(group.id))
        .await
        .unwrap_or_else(|_| panic!("balances failed"));
    assert_close(report.balances.get("A").unwrap(), 30.0);
    assert_close(report.balances.get("B").unwrap(), 0.0);
}

#[tokio::test]
async fn test_missing_group_maps_to_not_found() {
    let service = app_service();

    let result = group_balances(State(service), Path("nope".to_string())).await;

    match result {
        Err(err) => assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND),
        Ok(_) => panic!("expected not found"),
    }
}
