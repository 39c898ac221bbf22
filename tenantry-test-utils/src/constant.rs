//! Placeholder configuration values shared by tests.

/// Public base URL used when building invitation links in tests.
pub static TEST_APP_URL: &str = "http://localhost:3000";

/// Sender address for test e-mails.
pub static TEST_MAIL_FROM: &str = "no-reply@tenantry.test";

/// Path of the mock mail API endpoint on the mockito server.
pub static TEST_MAIL_PATH: &str = "/v1/send";

/// Redis URL used by tests gated behind the `redis-test` feature.
pub static TEST_REDIS_URL: &str = "redis://127.0.0.1:6379";
