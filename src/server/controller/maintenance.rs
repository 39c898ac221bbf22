use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        maintenance::{
            ApprovalDecisionDto, AssignVendorDto, CommentDto, CreateCommentDto,
            CreateMaintenanceDto, MaintenanceDetailDto, MaintenanceListQuery,
            MaintenanceRequestDto, UpdateMaintenanceStatusDto,
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
        service::maintenance::MaintenanceService,
    },
};

pub static MAINTENANCE_TAG: &str = "maintenance";

/// List maintenance requests visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/maintenance",
    tag = MAINTENANCE_TAG,
    params(MaintenanceListQuery),
    responses(
        (status = 200, description = "One page of requests", body = Vec<MaintenanceRequestDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_requests(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MaintenanceListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let requests = MaintenanceService::new(&state.db)
        .list(&actor, query)
        .await?;

    Ok(paginated(requests))
}

/// File a maintenance request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance",
    tag = MAINTENANCE_TAG,
    request_body = CreateMaintenanceDto,
    responses(
        (status = 201, description = "Request filed", body = MaintenanceRequestDto),
        (status = 400, description = "Invalid request or unit outside the property", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller neither manages nor leases at the property", body = ErrorDto),
        (status = 404, description = "Property or unit not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_request(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<CreateMaintenanceDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let request = MaintenanceService::new(&state.db)
        .create(&actor, request)
        .await?;

    Ok(created(request))
}

/// Get a request with its comments
#[utoipa::path(
    get,
    path = "/api/v1/maintenance/{id}",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance request ID")),
    responses(
        (status = 200, description = "The request", body = MaintenanceDetailDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Request not visible to the caller", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_request(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let request = MaintenanceService::new(&state.db)
        .get(&actor, request_id)
        .await?;

    Ok(ok(request))
}

/// Assign a vendor with an estimated cost
///
/// Costs above a PMC's limit for the priority wait for the landlord's approval.
#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/assign",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = AssignVendorDto,
    responses(
        (status = 200, description = "Assigned request", body = MaintenanceRequestDto),
        (status = 400, description = "Not a vendor, negative cost or request closed", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Request or vendor not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assign_vendor(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    ApiJson(assignment): ApiJson<AssignVendorDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let request = MaintenanceService::new(&state.db)
        .assign(
            &actor,
            request_id,
            assignment.vendor_id,
            assignment.estimated_cost_cents,
        )
        .await?;

    Ok(ok(request))
}

/// Approve or reject a vendor cost awaiting the owner
#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/approval",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = ApprovalDecisionDto,
    responses(
        (status = 200, description = "Decided request", body = MaintenanceRequestDto),
        (status = 400, description = "Nothing awaits approval", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not own the property", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn decide_approval(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    ApiJson(decision): ApiJson<ApprovalDecisionDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let request = MaintenanceService::new(&state.db)
        .decide_approval(&actor, request_id, decision.approve)
        .await?;

    Ok(ok(request))
}

#[utoipa::path(
    patch,
    path = "/api/v1/maintenance/{id}/status",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = UpdateMaintenanceStatusDto,
    responses(
        (status = 200, description = "Updated request", body = MaintenanceRequestDto),
        (status = 400, description = "Transition not allowed", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller may not make this transition", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    ApiJson(update): ApiJson<UpdateMaintenanceStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let request = MaintenanceService::new(&state.db)
        .update_status(&actor, request_id, update.status)
        .await?;

    Ok(ok(request))
}

#[utoipa::path(
    post,
    path = "/api/v1/maintenance/{id}/comments",
    tag = MAINTENANCE_TAG,
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment added", body = CommentDto),
        (status = 400, description = "Blank comment", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Request not visible to the caller", body = ErrorDto),
        (status = 404, description = "Request not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<i32>,
    ApiJson(comment): ApiJson<CreateCommentDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let comment = MaintenanceService::new(&state.db)
        .add_comment(&actor, request_id, &comment.body)
        .await?;

    Ok(created(comment))
}
