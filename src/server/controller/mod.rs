//! HTTP controller endpoints for the Tenantry API.
//!
//! Handlers resolve the session user, hand the request to a service and wrap
//! the result in the `{ success, data }` envelope. Every handler carries a
//! `utoipa::path` annotation collected by the router into the OpenAPI document.

pub mod auth;
pub mod dashboard;
pub mod document;
pub mod expense;
pub mod invitation;
pub mod lease;
pub mod maintenance;
pub mod notification;
pub mod property;
pub mod rent;
pub mod unit;
pub mod user;
pub mod util;
