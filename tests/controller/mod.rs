//! Integration tests calling the HTTP handlers directly.
//!
//! Each test builds a [`TestContext`](tenantry_test_utils::TestContext), signs a
//! user into its session and checks the status and envelope of the response.

mod auth;
mod dashboard;
mod document;
mod invitation;
mod lease;
mod maintenance;
mod notification;
mod property;
