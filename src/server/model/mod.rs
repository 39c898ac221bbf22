//! Server-side models: application state, session data, outbound e-mail and
//! background job definitions.

pub mod app;
pub mod mail;
pub mod session;
pub mod worker;
