use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use entity::app_user::Role;
use tenantry::{
    model::auth::{LoginDto, RegisterDto, VerifyLoginDto},
    server::{
        controller::{
            auth::{login, logout, me, register, verify},
            util::json::ApiJson,
        },
        model::session::user::SessionUserId,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

fn registration(email: &str, role: Role) -> RegisterDto {
    RegisterDto {
        email: email.to_string(),
        name: "Dana Whitfield".to_string(),
        role,
        phone: None,
    }
}

#[tokio::test]
/// Expect 201 and a login code e-mail when a landlord registers
async fn register_creates_landlord() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_mail_endpoint(200, 1)
        .build()
        .await?;

    let result = register(
        State(app_state(&test)),
        ApiJson(registration("Dana@Example.com", Role::Landlord)),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "dana@example.com");
    assert_eq!(body["data"]["role"], "landlord");
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect 400 when registering a role that must be invited
async fn register_rejects_tenant_role() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let result = register(
        State(app_state(&test)),
        ApiJson(registration("tenant@example.com", Role::Tenant)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
/// Expect 409 when the e-mail is already registered
async fn register_rejects_duplicate_email() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    test.user()
        .insert_user_with_email("taken@example.com", Role::Landlord)
        .await?;

    let result = register(
        State(app_state(&test)),
        ApiJson(registration("taken@example.com", Role::Pmc)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
/// Expect 202 without sending mail for an unknown address
async fn login_is_silent_for_unknown_email() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_mail_endpoint(200, 0)
        .build()
        .await?;

    let result = login(
        State(app_state(&test)),
        ApiJson(LoginDto {
            email: "nobody@example.com".to_string(),
        }),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["sent"], true);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect a valid code to sign the user in
async fn verify_signs_user_in() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let user = test.user().insert_landlord().await?;
    test.user()
        .insert_login_code(user.id, "482913", Utc::now().naive_utc() + Duration::minutes(5))
        .await?;

    let result = verify(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(VerifyLoginDto {
            email: user.email.clone(),
            code: "482913".to_string(),
        }),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let session_user = SessionUserId::get(&test.session).await.unwrap();
    assert_eq!(session_user, Some(user.id));

    Ok(())
}

#[tokio::test]
/// Expect 400 and no session for a wrong code
async fn verify_rejects_wrong_code() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let user = test.user().insert_landlord().await?;
    test.user()
        .insert_login_code(user.id, "482913", Utc::now().naive_utc() + Duration::minutes(5))
        .await?;

    let result = verify(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(VerifyLoginDto {
            email: user.email.clone(),
            code: "000000".to_string(),
        }),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}

#[tokio::test]
/// Expect 401 from /me without a session user
async fn me_requires_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;

    let result = me(State(app_state(&test)), test.session.clone()).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
/// Expect logout to clear the session user
async fn logout_clears_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let user = test.user().insert_tenant().await?;
    sign_in(&test, &user).await;

    let result = logout(test.session.clone()).await;

    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}

#[tokio::test]
/// Expect logout without a session user to succeed
async fn logout_without_session_succeeds() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;

    let result = logout(test.session.clone()).await;

    assert_eq!(result.unwrap().into_response().status(), StatusCode::OK);

    Ok(())
}
