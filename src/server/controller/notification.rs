use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{DeletionResultDto, ErrorDto},
        notification::{MarkedReadDto, NotificationDto, NotificationListQuery, UnreadCountDto},
    },
    server::{
        controller::util::{
            get_user::get_actor,
            response::{ok, paginated},
        },
        error::Error,
        model::app::AppState,
        service::notification::NotificationService,
    },
};

pub static NOTIFICATION_TAG: &str = "notification";

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = NOTIFICATION_TAG,
    params(NotificationListQuery),
    responses(
        (status = 200, description = "One page of notifications", body = Vec<NotificationDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let notifications = NotificationService::new(&state.db)
        .list(&actor, query.unread_only.unwrap_or(false), query.page_query())
        .await?;

    Ok(paginated(notifications))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let count = NotificationService::new(&state.db)
        .unread_count(&actor)
        .await?;

    Ok(ok(UnreadCountDto { count }))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = MarkedReadDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(notification_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    NotificationService::new(&state.db)
        .mark_read(&actor, notification_id)
        .await?;

    Ok(ok(MarkedReadDto { updated: 1 }))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Unread notifications marked read", body = MarkedReadDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    let updated = NotificationService::new(&state.db)
        .mark_all_read(&actor)
        .await?;

    Ok(ok(MarkedReadDto { updated }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = DeletionResultDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 404, description = "Notification not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    session: Session,
    Path(notification_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let actor = get_actor(&state, &session).await?;

    NotificationService::new(&state.db)
        .delete(&actor, notification_id)
        .await?;

    Ok(ok(DeletionResultDto { deleted: true }))
}
