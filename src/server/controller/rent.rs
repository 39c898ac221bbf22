use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        lease::{RecordPaymentDto, RentPaymentDto, RentPaymentListQuery},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::rent::RentService,
    },
};

pub static RENT_TAG: &str = "rent";

/// Rent schedule of a lease
#[utoipa::path(
    get,
    path = "/api/v1/leases/{id}/payments",
    tag = RENT_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    responses(
        (status = 200, description = "Payments ordered by due date", body = Vec<RentPaymentDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Lease not visible to the caller", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_lease_payments(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let payments = RentService::new(&state.db)
        .list_for_lease(&actor, lease_id)
        .await?;

    Ok(ok(payments))
}

/// List rent payments visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/rent-payments",
    tag = RENT_TAG,
    params(RentPaymentListQuery),
    responses(
        (status = 200, description = "One page of payments", body = Vec<RentPaymentDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_payments(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RentPaymentListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let payments = RentService::new(&state.db).list(&actor, query).await?;

    Ok(paginated(payments))
}

/// Record money received against a payment
#[utoipa::path(
    post,
    path = "/api/v1/rent-payments/{id}/record",
    tag = RENT_TAG,
    params(("id" = i32, Path, description = "Rent payment ID")),
    request_body = RecordPaymentDto,
    responses(
        (status = 200, description = "Updated payment", body = RentPaymentDto),
        (status = 400, description = "Invalid amount or payment already settled", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn record_payment(
    State(state): State<AppState>,
    session: Session,
    Path(payment_id): Path<i32>,
    ApiJson(payment): ApiJson<RecordPaymentDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let payment = RentService::new(&state.db)
        .record(&actor, payment_id, payment)
        .await?;

    Ok(ok(payment))
}

#[utoipa::path(
    post,
    path = "/api/v1/rent-payments/{id}/waive",
    tag = RENT_TAG,
    params(("id" = i32, Path, description = "Rent payment ID")),
    responses(
        (status = 200, description = "Waived payment", body = RentPaymentDto),
        (status = 400, description = "Payment already settled", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn waive_payment(
    State(state): State<AppState>,
    session: Session,
    Path(payment_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let payment = RentService::new(&state.db)
        .waive(&actor, payment_id)
        .await?;

    Ok(ok(payment))
}
