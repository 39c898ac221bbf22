//! Cron expressions for the daily housekeeping jobs.
//!
//! Expressions use the six-field `sec min hour day month weekday` format of
//! `tokio-cron-scheduler` and are evaluated in UTC. Jobs are staggered a few
//! minutes apart so they don't contend for the same rows.

pub mod rent {
    /// Overdue rent marking, daily at 00:05
    pub const CRON_EXPRESSION: &str = "0 5 0 * * *";
}

pub mod lease {
    /// Expiry of ended leases, daily at 00:10
    pub const CRON_EXPRESSION: &str = "0 10 0 * * *";
}

pub mod invitation {
    /// Expiry of stale invitations, daily at 00:15
    pub const CRON_EXPRESSION: &str = "0 15 0 * * *";
}

pub mod login_code {
    /// Purge of consumed or expired login codes, daily at 00:20
    pub const CRON_EXPRESSION: &str = "0 20 0 * * *";
}
