//! Retry logic with exponential backoff for service operations.
//!
//! [`RetryContext`] re-runs an operation while its error classifies as
//! transient (see [`Error::to_retry_strategy`]), sleeping between attempts.

use std::time::Duration;

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Context for executing operations with automatic retry logic.
///
/// The cache type `T` persists between attempts so an operation can skip work
/// that already succeeded; use `()` when there is nothing to keep.
///
/// # Retry Behavior
///
/// - **Max attempts**: 3 (default)
/// - **Backoff strategy**: Exponential starting at 1 second (1s, 2s, 4s, ...)
/// - **Retry conditions**: Only errors with `ErrorRetryStrategy::Retry` are retried
/// - **Permanent failures**: Errors with `ErrorRetryStrategy::Fail` return immediately
///
/// # Example
///
/// ```ignore
/// let mut ctx: RetryContext<()> = RetryContext::new();
/// let db = db.clone();
///
/// ctx.execute_with_retry("get user ID 1", |_| {
///     let db = db.clone();
///
///     Box::pin(async move { Ok(UserRepository::new(&db).get(1).await?) })
/// })
/// .await?;
/// ```
pub struct RetryContext<T> {
    /// Cache kept between attempts
    cache: T,
    /// Maximum number of attempts before giving up
    max_attempts: u32,
    /// Initial backoff (doubles with each retry)
    initial_backoff: Duration,
}

impl<T> Default for RetryContext<T>
where
    T: Clone + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RetryContext<T>
where
    T: Clone + Default,
{
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Creates a retry context with 3 attempts and 1 second initial backoff.
    pub fn new() -> Self {
        Self {
            cache: T::default(),
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Overrides attempt count and initial backoff.
    pub fn with_policy(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            cache: T::default(),
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Executes an operation with automatic retry logic and exponential backoff.
    ///
    /// # Arguments
    /// - `description` - Human-readable description for logging
    /// - `operation` - Async function that receives the mutable cache and returns `Result<R, Error>`
    ///
    /// # Returns
    /// - `Ok(R)` - Operation succeeded
    /// - `Err(Error)` - Operation failed permanently or exhausted all attempts
    pub async fn execute_with_retry<R, F>(
        &mut self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: for<'a> Fn(
            &'a mut T,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<R, Error>> + Send + 'a>,
        >,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation(&mut self.cache).await {
                Ok(result) => return Ok(result),
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => return Err(e),
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff = self.initial_backoff * 2_u32.pow(attempt_count - 1);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    use super::RetryContext;
    use crate::server::error::{mail::MailError, request::RequestError, Error};

    /// Expect transient failures to be retried until success
    #[tokio::test]
    async fn retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let mut ctx: RetryContext<u32> = RetryContext::with_policy(3, Duration::ZERO);

        let result = ctx
            .execute_with_retry("flaky operation", |attempts| {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                *attempts += 1;
                Box::pin(async move {
                    if call == 0 {
                        Err(Error::MailError(MailError::Rejected {
                            status: 503,
                            body: String::new(),
                        }))
                    } else {
                        Ok(call)
                    }
                })
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Expect permanent failures to return after one attempt
    #[tokio::test]
    async fn fails_fast_on_permanent_errors() {
        let calls = AtomicU32::new(0);
        let mut ctx: RetryContext<()> = RetryContext::with_policy(3, Duration::ZERO);

        let result: Result<(), Error> = ctx
            .execute_with_retry("invalid operation", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Err(RequestError::validation("bad input").into()) })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Expect the last error after exhausting attempts
    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let mut ctx: RetryContext<()> = RetryContext::with_policy(2, Duration::ZERO);

        let result: Result<(), Error> = ctx
            .execute_with_retry("always failing", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async {
                    Err(Error::MailError(MailError::Rejected {
                        status: 500,
                        body: "down".to_string(),
                    }))
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
