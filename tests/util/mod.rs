//! Helpers shared by the controller integration tests.

use axum::{body::to_bytes, response::Response};
use tenantry::server::{
    model::{app::AppState, session::user::SessionUserId},
    service::{
        mail::{MailDispatch, Mailer},
        rate_limit::RateLimiter,
    },
};
use tenantry_test_utils::prelude::*;

/// Application state over the test database, delivering mail to the mock mail API
pub fn app_state(test: &TestContext) -> AppState {
    AppState {
        db: test.db.clone(),
        mail: MailDispatch::Direct(Mailer::new(
            Some(test.mail_api_url()),
            None,
            test.mail_from(),
        )),
        rate_limiter: RateLimiter::disabled(),
        app_url: test.app_url(),
    }
}

/// Puts `user` into the test session
pub async fn sign_in(test: &TestContext, user: &UserModel) {
    SessionUserId::insert(&test.session, user.id)
        .await
        .expect("Failed to insert user into session");
}

/// Reads a response body as JSON
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}
