use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Failures caused by the request itself.
#[derive(Error, Debug)]
pub enum RequestError {
    /// A field failed validation
    #[error("{0}")]
    Validation(String),
    /// The body could not be parsed
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    /// The named resource does not exist or is not visible to the caller
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Uniqueness or overlap conflict
    #[error("{0}")]
    Conflict(String),
    /// The resource is not in a state that allows the operation
    #[error("{0}")]
    InvalidState(String),
}

impl RequestError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation(_) | Self::InvalidBody(_) | Self::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
        };

        tracing::debug!(status = %status, "{}", self);

        (status, Json(ErrorDto::new(self.to_string()))).into_response()
    }
}
