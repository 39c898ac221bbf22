use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{DeletionResultDto, ErrorDto, PageQuery},
        property::{AssignPmcDto, CreatePropertyDto, PropertyDto, UpdatePropertyDto},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{created, ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::property::PropertyService,
    },
};

pub static PROPERTY_TAG: &str = "property";

/// List properties visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = PROPERTY_TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "One page of properties", body = Vec<PropertyDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_properties(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let properties = PropertyService::new(&state.db).list(&actor, page).await?;

    Ok(paginated(properties))
}

/// Create a property
///
/// Landlords create properties for themselves; admins must name the landlord.
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = PROPERTY_TAG,
    request_body = CreatePropertyDto,
    responses(
        (status = 201, description = "Property created", body = PropertyDto),
        (status = 400, description = "Invalid property", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Role may not create properties", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_property(
    State(state): State<AppState>,
    session: Session,
    ApiJson(property): ApiJson<CreatePropertyDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let property = PropertyService::new(&state.db)
        .create(&actor, property)
        .await?;

    Ok(created(property))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "The property", body = PropertyDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Property not visible to the caller", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let property = PropertyService::new(&state.db)
        .get(&actor, property_id)
        .await?;

    Ok(ok(property))
}

#[utoipa::path(
    patch,
    path = "/api/v1/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    request_body = UpdatePropertyDto,
    responses(
        (status = 200, description = "Updated property", body = PropertyDto),
        (status = 400, description = "Invalid change", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    ApiJson(changes): ApiJson<UpdatePropertyDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let property = PropertyService::new(&state.db)
        .update(&actor, property_id, changes)
        .await?;

    Ok(ok(property))
}

/// Delete a property with no active lease
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property deleted", body = DeletionResultDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not own the property", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 409, description = "A unit has an active lease", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    PropertyService::new(&state.db)
        .delete(&actor, property_id)
        .await?;

    Ok(ok(DeletionResultDto { deleted: true }))
}

/// Assign or remove the property management company
#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}/pmc",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    request_body = AssignPmcDto,
    responses(
        (status = 200, description = "Updated property", body = PropertyDto),
        (status = 400, description = "Target user is not a PMC", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not own the property", body = ErrorDto),
        (status = 404, description = "Property or user not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn assign_pmc(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    ApiJson(assignment): ApiJson<AssignPmcDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let property = PropertyService::new(&state.db)
        .assign_pmc(&actor, property_id, assignment.pmc_id)
        .await?;

    Ok(ok(property))
}
