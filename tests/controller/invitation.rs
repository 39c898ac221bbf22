use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use entity::app_user::Role;
use tenantry::{
    model::invitation::{AcceptInvitationDto, CreateInvitationDto},
    server::{
        controller::{
            invitation::{accept_invitation, create_invitation, preview_invitation},
            util::json::ApiJson,
        },
        model::session::user::SessionUserId,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

#[tokio::test]
/// Expect 201 and an invitation e-mail for a tenant invite
async fn landlord_invites_tenant() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_mail_endpoint(200, 1)
        .build()
        .await?;
    let landlord = test.user().insert_landlord().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_draft_lease(unit.id, &[]).await?;
    sign_in(&test, &landlord).await;

    let result = create_invitation(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(CreateInvitationDto {
            email: "New.Tenant@Example.com".to_string(),
            role: Role::Tenant,
            lease_id: Some(lease.id),
        }),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(result.status(), StatusCode::CREATED);
    let body = body_json(result).await;
    assert_eq!(body["data"]["email"], "new.tenant@example.com");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["lease_id"], lease.id);
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect 403 when a tenant tries to invite anyone
async fn tenant_cannot_invite() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_all_tables()
        .with_mail_endpoint(200, 0)
        .build()
        .await?;
    let tenant = test.user().insert_tenant().await?;
    sign_in(&test, &tenant).await;

    let result = create_invitation(
        State(app_state(&test)),
        test.session.clone(),
        ApiJson(CreateInvitationDto {
            email: "friend@example.com".to_string(),
            role: Role::Tenant,
            lease_id: None,
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::FORBIDDEN
    );
    test.assert_mocks();

    Ok(())
}

#[tokio::test]
/// Expect acceptance to create the user and sign them in
async fn accepting_invitation_signs_in() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let invitation = test
        .invitation()
        .insert_invitation(
            landlord.id,
            "vendor@example.com",
            Role::Vendor,
            None,
            Utc::now().naive_utc() + Duration::days(3),
        )
        .await?;
    let state = app_state(&test);

    let preview = preview_invitation(State(state.clone()), Path(invitation.token.clone()))
        .await
        .unwrap()
        .into_response();
    let body = body_json(preview).await;
    assert_eq!(body["data"]["role"], "vendor");
    assert_eq!(body["data"]["inviter_name"], landlord.name);

    let accepted = accept_invitation(
        State(state),
        test.session.clone(),
        Path(invitation.token.clone()),
        ApiJson(AcceptInvitationDto {
            name: "Val Vendor".to_string(),
            phone: None,
        }),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(accepted.status(), StatusCode::OK);
    let body = body_json(accepted).await;
    assert_eq!(body["data"]["email"], "vendor@example.com");
    assert_eq!(body["data"]["role"], "vendor");
    let session_user = SessionUserId::get(&test.session).await.unwrap();
    assert_eq!(session_user.map(serde_json::Value::from), Some(body["data"]["id"].clone()));

    Ok(())
}

#[tokio::test]
/// Expect 400 when the invitation has expired
async fn expired_invitation_cannot_be_accepted() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let invitation = test
        .invitation()
        .insert_invitation(
            landlord.id,
            "late@example.com",
            Role::Tenant,
            None,
            Utc::now().naive_utc() - Duration::hours(1),
        )
        .await?;

    let result = accept_invitation(
        State(app_state(&test)),
        test.session.clone(),
        Path(invitation.token),
        ApiJson(AcceptInvitationDto {
            name: "Late Tenant".to_string(),
            phone: None,
        }),
    )
    .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}
