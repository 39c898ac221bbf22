use sea_orm::DatabaseConnection;

use crate::server::service::{mail::MailDispatch, rate_limit::RateLimiter};

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Where outbound e-mail goes: the job queue in production, direct delivery in tests
    pub mail: MailDispatch,
    pub rate_limiter: RateLimiter,
    /// Public base URL of the web application, without trailing slash
    pub app_url: String,
}
