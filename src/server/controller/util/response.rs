use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{model::api::ApiResponse, server::data::Page};

/// 200 with `{ success: true, data }`
pub fn ok<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::OK, data)
}

/// 201 with `{ success: true, data }`
pub fn created<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::CREATED, data)
}

/// 202 with `{ success: true, data }`
pub fn accepted<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::ACCEPTED, data)
}

/// 200 with `{ success: true, data, pagination }`
pub fn paginated<T: Serialize>(page: Page<T>) -> Response {
    let pagination = page.pagination();

    (
        StatusCode::OK,
        Json(ApiResponse::paginated(page.items, pagination)),
    )
        .into_response()
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::ok(data))).into_response()
}
