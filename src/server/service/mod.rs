//! Service layer for business logic and orchestration.
//!
//! Services enforce access rules through [`access::Actor`], validate input,
//! coordinate repositories inside transactions where several rows change
//! together, and emit notifications. Controllers stay thin wrappers around
//! these calls; scheduled jobs call the same services.

pub mod access;
pub mod auth;
pub mod dashboard;
pub mod document;
pub mod expense;
pub mod invitation;
pub mod lease;
pub mod lookup;
pub mod mail;
pub mod maintenance;
pub mod notification;
pub mod property;
pub mod rate_limit;
pub mod rent;
pub mod retry;
pub mod unit;
pub mod user;
pub mod validate;
