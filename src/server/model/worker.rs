use serde::{Deserialize, Serialize};

use crate::server::model::mail::Email;

/// Jobs processed by the background worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerJob {
    SendEmail(Email),
}

impl WorkerJob {
    /// Short description used in logs
    pub fn describe(&self) -> String {
        match self {
            Self::SendEmail(email) => format!("e-mail \"{}\" to {}", email.subject, email.to),
        }
    }
}
