//! Background job handler run by the apalis worker.

use apalis::prelude::Data;

use crate::server::{
    error::Error, model::worker::WorkerJob, service::mail::Mailer, service::retry::RetryContext,
};

pub async fn handle_job(job: WorkerJob, mailer: Data<Mailer>) -> Result<(), Error> {
    let description = job.describe();
    tracing::debug!("Processing {}", description);

    match job {
        WorkerJob::SendEmail(email) => {
            let mailer = (*mailer).clone();
            let mut ctx: RetryContext<()> = RetryContext::new();

            ctx.execute_with_retry(&description, |_| {
                let mailer = mailer.clone();
                let email = email.clone();

                Box::pin(async move { mailer.send(&email).await })
            })
            .await
            .map_err(|e| {
                tracing::error!("Failed to process {}: {:?}", description, e);
                e
            })?;
        }
    }

    tracing::debug!("Finished {}", description);

    Ok(())
}
