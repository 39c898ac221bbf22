use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        user::{UpdateProfileDto, UserDto, UserListQuery},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            json::ApiJson,
            response::{ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::user::UserService,
    },
};

pub static USER_TAG: &str = "user";

/// List users, admin only
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = USER_TAG,
    params(UserListQuery),
    responses(
        (status = 200, description = "One page of users", body = Vec<UserDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let users = UserService::new(&state.db).list(&actor, query).await?;

    Ok(paginated(users))
}

/// Get a user, admin or self
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Neither admin nor self", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let user = UserService::new(&state.db).get(&actor, user_id).await?;

    Ok(ok(user))
}

/// Update the signed-in user's name or phone
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = USER_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 400, description = "Blank name", body = ErrorDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    ApiJson(profile): ApiJson<UpdateProfileDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let user = UserService::new(&state.db)
        .update_profile(&actor, profile)
        .await?;

    Ok(ok(user))
}
