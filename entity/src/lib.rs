//! SeaORM entity definitions for the Tenantry database schema.
//!
//! Each module maps one table created by the `migration` crate. Enumerations are stored as
//! lower snake-case text so the same entities work against PostgreSQL in production and
//! SQLite in tests.

pub mod prelude;

pub mod app_user;
pub mod document;
pub mod document_version;
pub mod expense;
pub mod invitation;
pub mod lease;
pub mod lease_tenant;
pub mod login_code;
pub mod maintenance_comment;
pub mod maintenance_request;
pub mod notification;
pub mod property;
pub mod rent_payment;
pub mod unit;
