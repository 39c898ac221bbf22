//! Cron-based scheduler for daily housekeeping.
//!
//! Overdue rent, ended leases, stale invitations and spent login codes are
//! swept once a day. Every job logs how many rows it touched.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::error::Error;

pub mod config;
pub mod jobs;

use self::config::{
    invitation as invitation_config, lease as lease_config, login_code as login_code_config,
    rent as rent_config,
};
use self::jobs::{
    expire_ended_leases, expire_stale_invitations, mark_overdue_rent, purge_login_codes,
};

/// Job scheduler running the daily housekeeping jobs.
pub struct Scheduler {
    db: DatabaseConnection,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, sched })
    }

    /// Registers all housekeeping jobs and starts the scheduler.
    ///
    /// The following jobs are registered:
    /// - Overdue rent marking
    /// - Ended lease expiry
    /// - Stale invitation expiry
    /// - Login code purge
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(rent_config::CRON_EXPRESSION, "overdue rent", mark_overdue_rent)
            .await?;

        self.schedule_job(lease_config::CRON_EXPRESSION, "ended lease", expire_ended_leases)
            .await?;

        self.schedule_job(
            invitation_config::CRON_EXPRESSION,
            "stale invitation",
            expire_stale_invitations,
        )
        .await?;

        self.schedule_job(
            login_code_config::CRON_EXPRESSION,
            "login code",
            purge_login_codes,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The function receives a clone of the database connection. On execution the job logs the
    /// number of rows touched, or the error that stopped it.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run (e.g., "0 5 0 * * *" for daily at 00:05)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async function performing the sweep, returning the count of rows touched
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<u64, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db).await {
                        Ok(count) => tracing::info!("Processed {} {} row(s)", count, name),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
