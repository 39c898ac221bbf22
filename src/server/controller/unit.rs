use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{DeletionResultDto, ErrorDto},
        property::{CreateUnitDto, UnitDto, UpdateUnitDto},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{created, ok},
        },
        error::Error,
        model::app::AppState,
        service::unit::UnitService,
    },
};

pub static UNIT_TAG: &str = "unit";

/// List the units of a property
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/units",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Units of the property", body = Vec<UnitDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Property not visible to the caller", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_units(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let units = UnitService::new(&state.db).list(&actor, property_id).await?;

    Ok(ok(units))
}

/// Add a unit to a property; new units start vacant
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/units",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    request_body = CreateUnitDto,
    responses(
        (status = 201, description = "Unit created", body = UnitDto),
        (status = 400, description = "Invalid unit", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 409, description = "Unit number already used in the property", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_unit(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    ApiJson(unit): ApiJson<CreateUnitDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let unit = UnitService::new(&state.db)
        .create(&actor, property_id, unit)
        .await?;

    Ok(created(unit))
}

#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "The unit", body = UnitDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Unit not visible to the caller", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let unit = UnitService::new(&state.db).get(&actor, unit_id).await?;

    Ok(ok(unit))
}

#[utoipa::path(
    patch,
    path = "/api/v1/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = UpdateUnitDto,
    responses(
        (status = 200, description = "Updated unit", body = UnitDto),
        (status = 400, description = "Invalid change", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 409, description = "Unit number already used in the property", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
    ApiJson(changes): ApiJson<UpdateUnitDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let unit = UnitService::new(&state.db)
        .update(&actor, unit_id, changes)
        .await?;

    Ok(ok(unit))
}

#[utoipa::path(
    delete,
    path = "/api/v1/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit deleted", body = DeletionResultDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Caller does not manage the property", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 409, description = "Unit has an active lease", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    UnitService::new(&state.db).delete(&actor, unit_id).await?;

    Ok(ok(DeletionResultDto { deleted: true }))
}
