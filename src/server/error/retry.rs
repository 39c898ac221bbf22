use sea_orm::DbErr;

use super::{mail::MailError, Error};

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::MailError(MailError::Request(reqwest_error)) => match reqwest_error.status() {
                // Mail provider unavailable, back off and retry
                Some(status) if status.is_server_error() => ErrorRetryStrategy::Retry,
                Some(_) => ErrorRetryStrategy::Fail,
                // Network error or timeout
                None => ErrorRetryStrategy::Retry,
            },
            Self::MailError(MailError::Rejected { status, .. }) => {
                if *status >= 500 || *status == 429 {
                    ErrorRetryStrategy::Retry
                } else {
                    ErrorRetryStrategy::Fail
                }
            }
            Self::MailError(MailError::Enqueue(_)) => ErrorRetryStrategy::Retry,

            Self::DbErr(db_err) => match db_err {
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                // Query, constraint and conversion errors won't resolve with retry
                _ => ErrorRetryStrategy::Fail,
            },

            // Could be Redis connection issues
            Self::SessionError(_) => ErrorRetryStrategy::Retry,
            Self::RedisError(_) => ErrorRetryStrategy::Retry,
            Self::ApalisRedisError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::AuthError(_) => ErrorRetryStrategy::Fail,
            Self::RequestError(_) => ErrorRetryStrategy::Fail,
            Self::ParseError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
            Self::IoError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
