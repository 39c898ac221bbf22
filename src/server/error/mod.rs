//! Error types for the Tenantry server.
//!
//! Domain errors (`AuthError`, `RequestError`, `ConfigError`, `MailError`) and
//! library errors are aggregated into [`Error`]. Every domain enum implements
//! `IntoResponse`; anything without a specific mapping becomes a logged 500.

pub mod auth;
pub mod config;
pub mod mail;
pub mod request;
pub mod retry;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::{
        data::is_unique_violation,
        error::{
            auth::AuthError, config::ConfigError, mail::MailError, request::RequestError,
        },
    },
};

/// Main error type for the Tenantry server.
///
/// `#[from]` conversions let every layer propagate failures with `?`; the
/// `IntoResponse` implementation picks the HTTP status.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Invalid input, missing resource, conflict or disallowed state change.
    #[error(transparent)]
    RequestError(#[from] RequestError),
    /// Outbound e-mail delivery failure.
    #[error(transparent)]
    MailError(#[from] MailError),
    /// Failed to parse a stored value.
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Tenantry's code.
    #[error("Internal error, this indicates a bug: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Valkey/Redis error (sessions, rate limiting).
    #[error(transparent)]
    RedisError(#[from] fred::prelude::Error),
    /// Job queue connection error.
    #[error(transparent)]
    ApalisRedisError(#[from] apalis_redis::RedisError),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Socket error while binding or serving HTTP.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::RequestError(err) => err.into_response(),
            Self::MailError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Unique index violations are conflicts with existing rows.
impl From<sea_orm::DbErr> for Error {
    fn from(err: sea_orm::DbErr) -> Self {
        if is_unique_violation(&err) {
            tracing::debug!("Unique constraint violation: {}", err);

            return Self::RequestError(RequestError::conflict("Resource already exists"));
        }

        Self::DbErr(err)
    }
}

/// Malformed or mistyped JSON bodies are client errors.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::RequestError(RequestError::InvalidBody(rejection.body_text()))
    }
}

/// Wrapper converting any displayable error into a 500 Internal Server Error.
///
/// The full error is logged; the client only sees a generic message.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto::new("Internal server error")),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use entity::app_user::Role;
    use tenantry_test_utils::prelude::*;

    use super::*;
    use crate::server::data::user::UserRepository;

    /// Expected: database errors surface as a generic 500
    #[test]
    fn db_error_is_internal_server_error() {
        let resp = Error::DbErr(sea_orm::DbErr::Custom("boom".to_string())).into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Expected: request errors keep their own status
    #[test]
    fn request_error_passes_through() {
        let resp = Error::from(RequestError::Conflict("Duplicate".to_string())).into_response();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    /// Expected: a duplicate insert racing past the service checks is a 409
    #[tokio::test]
    async fn unique_violation_is_conflict() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let repo = UserRepository::new(&test.db);
        repo.create("dup@example.com", "First", Role::Landlord, None)
            .await?;

        let err = repo
            .create("dup@example.com", "Second", Role::Landlord, None)
            .await
            .map_err(Error::from)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::RequestError(RequestError::Conflict(_))
        ));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        Ok(())
    }
}
