//! Fixed-window rate limiting backed by Valkey.

use fred::prelude::*;

use crate::server::error::{auth::AuthError, Error};

// Increments the window counter and starts the window on first hit
//
// KEYS[1]: counter key
// ARGV[1]: window length in seconds
//
// Returns: hits in the current window including this one
static INCREMENT_WINDOW_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('EXPIRE', KEYS[1], tonumber(ARGV[1]))
end
return count
"#;

/// Counts hits per key in fixed windows. Without a pool every hit is allowed.
#[derive(Clone)]
pub struct RateLimiter {
    pool: Option<Pool>,
    prefix: String,
}

impl RateLimiter {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool: Some(pool),
            prefix: "tenantry:rate".to_string(),
        }
    }

    /// Limiter that never rejects, used where no Valkey instance is available
    pub fn disabled() -> Self {
        Self {
            pool: None,
            prefix: String::new(),
        }
    }

    /// Overrides the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Records a hit for `key`, failing with `AuthError::RateLimited` once
    /// more than `max_hits` land in the window.
    pub async fn check(&self, key: &str, max_hits: u64, window_secs: u64) -> Result<(), Error> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };

        let redis_key = format!("{}:{}", self.prefix, key);
        let hits: i64 = pool
            .eval(
                INCREMENT_WINDOW_SCRIPT,
                vec![redis_key],
                vec![window_secs.to_string()],
            )
            .await?;

        if hits > max_hits as i64 {
            return Err(AuthError::RateLimited(key_scope(key).to_string()).into());
        }

        Ok(())
    }
}

/// Action part of a `scope:subject` key; the subject (an e-mail) is not logged
fn key_scope(key: &str) -> &str {
    key.split_once(':').map_or(key, |(scope, _)| scope)
}
