//! Outbound e-mail delivery.
//!
//! [`Mailer`] posts messages to an HTTP mail API. [`MailDispatch`] decides
//! whether a message is queued for the background worker or delivered inline.

use apalis::prelude::Storage;
use apalis_redis::RedisStorage;
use serde::Serialize;

use crate::server::{
    config::Config,
    error::{mail::MailError, Error},
    model::{mail::Email, worker::WorkerJob},
};

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Client for the mail API. Without an endpoint messages are only logged.
#[derive(Clone, Debug)]
pub struct Mailer {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
}

impl Mailer {
    pub fn new(api_url: Option<String>, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mail_api_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )
    }

    /// Delivers one message
    ///
    /// # Returns
    /// - `Ok(())` - Accepted by the mail API, or logged when no API is configured
    /// - `Err(Error::MailError)` - Network failure or non-success status from the API
    pub async fn send(&self, email: &Email) -> Result<(), Error> {
        let Some(api_url) = &self.api_url else {
            tracing::info!(
                "Mail API not configured, dropping e-mail \"{}\" to {}",
                email.subject,
                email.to
            );
            return Ok(());
        };

        let mut request = self.client.post(api_url).json(&MailRequest {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(MailError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        tracing::debug!("Delivered e-mail \"{}\" to {}", email.subject, email.to);

        Ok(())
    }
}

/// Route for outbound e-mail
#[derive(Clone)]
pub enum MailDispatch {
    /// Push onto the worker queue
    Queue(RedisStorage<WorkerJob>),
    /// Deliver inline
    Direct(Mailer),
}

impl MailDispatch {
    pub async fn send(&self, email: Email) -> Result<(), Error> {
        match self {
            Self::Queue(storage) => {
                let job = WorkerJob::SendEmail(email);
                let description = job.describe();

                storage
                    .clone()
                    .push(job)
                    .await
                    .map_err(|e| MailError::Enqueue(e.to_string()))?;

                tracing::debug!("Queued {}", description);

                Ok(())
            }
            Self::Direct(mailer) => mailer.send(&email).await,
        }
    }

    /// Sends and logs failures instead of returning them
    ///
    /// Used where the e-mail is a side effect of an operation that already succeeded.
    pub async fn send_or_log(&self, email: Email) {
        let to = email.to.clone();
        if let Err(e) = self.send(email).await {
            tracing::warn!("Failed to send e-mail to {}: {:?}", to, e);
        }
    }
}
