use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        auth::{LoginCodeSentDto, LoginDto, RegisterDto, VerifyLoginDto},
        user::UserDto,
    },
    server::{
        controller::util::{
            get_user::get_user_from_session,
            json::ApiJson,
            response::{accepted, created, ok},
        },
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Self-service sign-up for landlords and property management companies
///
/// Creates the account and e-mails a login code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Invalid e-mail, blank name or role not allowed", body = ErrorDto),
        (status = 409, description = "E-mail already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<RegisterDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db, &state.mail, &state.rate_limiter)
        .register(registration)
        .await?;

    Ok(created(user))
}

/// Request a login code by e-mail
///
/// Always answers 202 so registered addresses cannot be discovered.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 202, description = "Login code sent if the account exists", body = LoginCodeSentDto),
        (status = 400, description = "Invalid e-mail", body = ErrorDto),
        (status = 429, description = "Too many login attempts", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(login): ApiJson<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state.db, &state.mail, &state.rate_limiter)
        .request_login_code(&login.email)
        .await?;

    Ok(accepted(LoginCodeSentDto { sent: true }))
}

/// Exchange a login code for a session
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    tag = AUTH_TAG,
    request_body = VerifyLoginDto,
    responses(
        (status = 200, description = "Signed in", body = UserDto),
        (status = 400, description = "Invalid or expired login code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    ApiJson(verification): ApiJson<VerifyLoginDto>,
) -> Result<impl IntoResponse, Error> {
    let user = AuthService::new(&state.db, &state.mail, &state.rate_limiter)
        .verify_login_code(&verification.email, &verification.code)
        .await?;

    SessionUserId::insert(&session, user.id).await?;

    Ok(ok(UserDto::from(user)))
}

/// Logs the user out by clearing their session
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Signed out"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    // Clearing a session that was never stored fails in the store
    if SessionUserId::get(&session).await?.is_some() {
        session.clear().await;
    }

    Ok(ok(()))
}

/// Currently signed-in user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Signed-in user", body = UserDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    Ok(ok(UserDto::from(user)))
}
