use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug)]
pub enum MailError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Mail API rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Failed to enqueue e-mail job: {0}")]
    Enqueue(String),
}

impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
