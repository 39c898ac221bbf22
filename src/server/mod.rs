//! Server application core modules.
//!
//! HTTP routing, session handling, role-based access control, persistence,
//! background e-mail workers and the daily maintenance scheduler of the
//! Tenantry property-management API.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
pub mod worker;
