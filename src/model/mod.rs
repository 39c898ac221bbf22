//! Request and response bodies of the HTTP API.

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod document;
pub mod expense;
pub mod invitation;
pub mod lease;
pub mod maintenance;
pub mod notification;
pub mod property;
pub mod user;
