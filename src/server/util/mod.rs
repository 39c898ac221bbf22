//! Utility functions shared by services and scheduled jobs.

pub mod money;
pub mod time;
