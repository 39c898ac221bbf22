//! Fixture helpers used during Phase 2 of a test.
//!
//! Each submodule adds an accessor on [`TestContext`](crate::TestContext)
//! (`test.user()`, `test.property()`, ...) returning a struct whose methods
//! insert rows with sensible defaults. `factory` builds in-memory models
//! without touching the database.

pub mod document;
pub mod expense;
pub mod factory;
pub mod invitation;
pub mod lease;
pub mod maintenance;
pub mod notification;
pub mod property;
pub mod user;
