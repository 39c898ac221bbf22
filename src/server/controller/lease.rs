use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        lease::{
            AddTenantDto, CreateLeaseDto, LeaseDto, LeaseListQuery, TerminateLeaseDto,
            UpdateLeaseDto,
        },
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{created, ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::lease::LeaseService,
    },
};

pub static LEASE_TAG: &str = "lease";

/// List leases visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/leases",
    tag = LEASE_TAG,
    params(LeaseListQuery),
    responses(
        (status = 200, description = "One page of leases", body = Vec<LeaseDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_leases(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<LeaseListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let leases = LeaseService::new(&state.db).list(&actor, query).await?;

    Ok(paginated(leases))
}

/// Create a draft lease
#[utoipa::path(
    post,
    path = "/api/v1/leases",
    tag = LEASE_TAG,
    request_body = CreateLeaseDto,
    responses(
        (status = 201, description = "Draft lease created", body = LeaseDto),
        (status = 400, description = "Invalid terms or tenants", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the unit's property", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 409, description = "Overlaps another lease on the unit", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_lease(
    State(state): State<AppState>,
    session: Session,
    ApiJson(lease): ApiJson<CreateLeaseDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db).create(&actor, lease).await?;

    Ok(created(lease))
}

#[utoipa::path(
    get,
    path = "/api/v1/leases/{id}",
    tag = LEASE_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    responses(
        (status = 200, description = "The lease", body = LeaseDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Lease not visible to the caller", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_lease(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db).get(&actor, lease_id).await?;

    Ok(ok(lease))
}

/// Change the terms of a draft lease
#[utoipa::path(
    patch,
    path = "/api/v1/leases/{id}",
    tag = LEASE_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    request_body = UpdateLeaseDto,
    responses(
        (status = 200, description = "Updated lease", body = LeaseDto),
        (status = 400, description = "Invalid terms or lease is not a draft", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 409, description = "Overlaps another lease on the unit", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_lease(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
    ApiJson(changes): ApiJson<UpdateLeaseDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db)
        .update(&actor, lease_id, changes)
        .await?;

    Ok(ok(lease))
}

/// Activate a draft lease and generate its rent schedule
#[utoipa::path(
    post,
    path = "/api/v1/leases/{id}/activate",
    tag = LEASE_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    responses(
        (status = 200, description = "Active lease", body = LeaseDto),
        (status = 400, description = "Lease is not a draft", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn activate_lease(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db)
        .activate(&actor, lease_id)
        .await?;

    Ok(ok(lease))
}

/// Terminate an active lease, waiving rent due after the effective date
#[utoipa::path(
    post,
    path = "/api/v1/leases/{id}/terminate",
    tag = LEASE_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    request_body = TerminateLeaseDto,
    responses(
        (status = 200, description = "Terminated lease", body = LeaseDto),
        (status = 400, description = "Lease is not active", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Lease not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn terminate_lease(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
    ApiJson(termination): ApiJson<TerminateLeaseDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db)
        .terminate(&actor, lease_id, termination.effective_date)
        .await?;

    Ok(ok(lease))
}

#[utoipa::path(
    post,
    path = "/api/v1/leases/{id}/tenants",
    tag = LEASE_TAG,
    params(("id" = i32, Path, description = "Lease ID")),
    request_body = AddTenantDto,
    responses(
        (status = 200, description = "Lease with the new tenant", body = LeaseDto),
        (status = 400, description = "User is not a tenant or lease has ended", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Lease or user not found", body = ErrorDto),
        (status = 409, description = "Tenant already on the lease", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_tenant(
    State(state): State<AppState>,
    session: Session,
    Path(lease_id): Path<i32>,
    ApiJson(tenant): ApiJson<AddTenantDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db)
        .add_tenant(&actor, lease_id, tenant.tenant_id)
        .await?;

    Ok(ok(lease))
}

#[utoipa::path(
    delete,
    path = "/api/v1/leases/{id}/tenants/{tenant_id}",
    tag = LEASE_TAG,
    params(
        ("id" = i32, Path, description = "Lease ID"),
        ("tenant_id" = i32, Path, description = "Tenant user ID")
    ),
    responses(
        (status = 200, description = "Lease without the tenant", body = LeaseDto),
        (status = 400, description = "Tenant is the last one on the lease", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the lease", body = ErrorDto),
        (status = 404, description = "Lease not found or tenant not on it", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_tenant(
    State(state): State<AppState>,
    session: Session,
    Path((lease_id, tenant_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let lease = LeaseService::new(&state.db)
        .remove_tenant(&actor, lease_id, tenant_id)
        .await?;

    Ok(ok(lease))
}
