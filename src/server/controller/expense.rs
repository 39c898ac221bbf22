use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{DeletionResultDto, ErrorDto},
        expense::{CreateExpenseDto, ExpenseDto, ExpenseListQuery, ExpenseReportDto},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{created, ok},
        },
        error::Error,
        model::app::AppState,
        service::expense::ExpenseService,
    },
};

pub static EXPENSE_TAG: &str = "expense";

/// Expenses of a property with totals per category
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/expenses",
    tag = EXPENSE_TAG,
    params(("id" = i32, Path, description = "Property ID"), ExpenseListQuery),
    responses(
        (status = 200, description = "Expense report", body = ExpenseReportDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn expense_report(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let report = ExpenseService::new(&state.db)
        .report(&actor, property_id, query)
        .await?;

    Ok(ok(report))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/expenses",
    tag = EXPENSE_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    request_body = CreateExpenseDto,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseDto),
        (status = 400, description = "Invalid amount or request from another property", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Property or maintenance request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_expense(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    ApiJson(expense): ApiJson<CreateExpenseDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let expense = ExpenseService::new(&state.db)
        .create(&actor, property_id, expense)
        .await?;

    Ok(created(expense))
}

#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    tag = EXPENSE_TAG,
    params(("id" = i32, Path, description = "Expense ID")),
    responses(
        (status = 200, description = "Expense deleted", body = DeletionResultDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Expense not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_expense(
    State(state): State<AppState>,
    session: Session,
    Path(expense_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    ExpenseService::new(&state.db)
        .delete(&actor, expense_id)
        .await?;

    Ok(ok(DeletionResultDto { deleted: true }))
}
