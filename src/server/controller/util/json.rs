use axum::extract::FromRequest;

use crate::server::error::Error;

/// `axum::Json` whose rejection is turned into the API's JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);
