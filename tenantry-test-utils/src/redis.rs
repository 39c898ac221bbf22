use std::sync::Mutex;

use fred::prelude::*;

use crate::{constant::TEST_REDIS_URL, TestError};

/// Redis connection for tests gated behind the `redis-test` feature.
///
/// Every instance owns a unique key prefix. Keys handed out by [`RedisTest::key`]
/// are removed when the struct is dropped so parallel tests never observe each
/// other's counters.
pub struct RedisTest {
    pub redis_pool: Pool,
    prefix: String,
    issued_keys: Mutex<Vec<String>>,
}

impl RedisTest {
    pub async fn new() -> Result<Self, TestError> {
        let redis_config = Config::from_url(TEST_REDIS_URL)?;
        let redis_pool = Pool::new(redis_config, None, None, None, 2)?;
        redis_pool.init().await?;

        Ok(RedisTest {
            redis_pool,
            prefix: Self::generate_unique_prefix(),
            issued_keys: Mutex::new(Vec::new()),
        })
    }

    /// Namespaces `key` under this instance's prefix and schedules it for cleanup.
    pub fn key(&self, key: &str) -> String {
        let key = format!("{}:{}", self.prefix, key);
        if let Ok(mut issued) = self.issued_keys.lock() {
            issued.push(key.clone());
        }
        key
    }

    /// Unique key prefix built from the current time and thread id
    fn generate_unique_prefix() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = DefaultHasher::new();
        timestamp.hash(&mut hasher);
        std::thread::current().id().hash(&mut hasher);

        format!("test:{}:{:x}", timestamp, hasher.finish())
    }
}

impl Drop for RedisTest {
    fn drop(&mut self) {
        // Spawn instead of blocking to avoid nesting runtimes
        let pool = self.redis_pool.clone();
        let keys = self
            .issued_keys
            .lock()
            .map(|issued| issued.clone())
            .unwrap_or_default();

        if keys.is_empty() {
            return;
        }

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _: Result<i64, fred::error::Error> = pool.del(keys).await;
            });
        }
    }
}
