use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("{0}")]
    Forbidden(String),
    #[error("Invalid or expired login code")]
    InvalidLoginCode,
    /// Carries the limited action (`login`, `verify`), never the counter key
    #[error("Too many {0} attempts")]
    RateLimited(String),
}

impl AuthError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    fn not_authenticated() -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorDto::new("Not authenticated")),
        )
            .into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                Self::not_authenticated()
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(user_id = %user_id, "{}", self);

                Self::not_authenticated()
            }
            Self::Forbidden(reason) => {
                tracing::debug!(reason = %reason, "Forbidden");

                (
                    StatusCode::FORBIDDEN,
                    Json(ErrorDto::new("You do not have access to this resource")),
                )
                    .into_response()
            }
            Self::InvalidLoginCode => {
                tracing::debug!("{}", self);

                (StatusCode::BAD_REQUEST, Json(ErrorDto::new(self.to_string()))).into_response()
            }
            Self::RateLimited(_) => {
                tracing::warn!("{}", self);

                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorDto::new(
                        "Too many login attempts, please try again later",
                    )),
                )
                    .into_response()
            }
        }
    }
}
