use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tenantry::{
    model::document::NewVersionDto,
    server::controller::{
        document::{add_version, approve_deletion, delete_document, get_document, mutual_approve},
        util::json::ApiJson,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

#[tokio::test]
/// Expect a lease document deletion to wait for the tenant, then complete
async fn lease_document_deletion_needs_both_sides() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    let document = test
        .document()
        .insert_document(property.id, Some(lease.id), landlord.id)
        .await?;
    let state = app_state(&test);
    sign_in(&test, &landlord).await;

    let requested = delete_document(State(state.clone()), test.session.clone(), Path(document.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(requested.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(requested).await["data"]["deleted"], false);

    sign_in(&test, &tenant).await;
    let approved = approve_deletion(State(state.clone()), test.session.clone(), Path(document.id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(approved.status(), StatusCode::OK);
    assert_eq!(body_json(approved).await["data"]["deleted"], true);

    let gone = get_document(State(state), test.session.clone(), Path(document.id)).await;
    assert_eq!(
        gone.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}

#[tokio::test]
/// Expect a property document to be deleted at once
async fn property_document_is_deleted_immediately() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let document = test
        .document()
        .insert_document(property.id, None, landlord.id)
        .await?;
    sign_in(&test, &landlord).await;

    let result = delete_document(State(app_state(&test)), test.session.clone(), Path(document.id))
        .await
        .unwrap()
        .into_response();

    assert_eq!(result.status(), StatusCode::OK);
    assert_eq!(body_json(result).await["data"]["deleted"], true);

    Ok(())
}

#[tokio::test]
/// Expect a tenant's proposed version to apply once the landlord approves
async fn version_change_applies_after_mutual_approval() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let tenant = test.user().insert_tenant().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let unit = test.property().insert_unit(property.id).await?;
    let lease = test.lease().insert_active_lease(unit.id, &[tenant.id]).await?;
    let document = test
        .document()
        .insert_document(property.id, Some(lease.id), landlord.id)
        .await?;
    let state = app_state(&test);
    sign_in(&test, &tenant).await;

    let proposed = add_version(
        State(state.clone()),
        test.session.clone(),
        Path(document.id),
        ApiJson(NewVersionDto {
            file_name: "lease-signed.pdf".to_string(),
            storage_key: "documents/lease-signed.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 2048,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let body = body_json(proposed).await;
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["pending_change"]["approval"]["tenant_approved"], true);
    assert_eq!(body["data"]["pending_change"]["approval"]["landlord_approved"], false);

    sign_in(&test, &landlord).await;
    let applied = mutual_approve(State(state.clone()), test.session.clone(), Path(document.id))
        .await
        .unwrap()
        .into_response();
    let body = body_json(applied).await;
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["file_name"], "lease-signed.pdf");
    assert!(body["data"]["pending_change"].is_null());

    let detail = get_document(State(state), test.session.clone(), Path(document.id))
        .await
        .unwrap()
        .into_response();
    let body = body_json(detail).await;
    assert_eq!(body["data"]["versions"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
/// Expect 400 when approving with nothing pending
async fn mutual_approve_without_pending_change_fails() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let landlord = test.user().insert_landlord().await?;
    let property = test.property().insert_property(landlord.id).await?;
    let document = test
        .document()
        .insert_document(property.id, None, landlord.id)
        .await?;
    sign_in(&test, &landlord).await;

    let result = mutual_approve(State(app_state(&test)), test.session.clone(), Path(document.id))
        .await;

    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );

    Ok(())
}
