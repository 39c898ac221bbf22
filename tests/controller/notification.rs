use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tenantry::{
    model::notification::NotificationListQuery,
    server::controller::notification::{
        delete_notification, list_notifications, mark_all_read, mark_read, unread_count,
    },
};
use tenantry_test_utils::prelude::*;

use crate::util::{app_state, body_json, sign_in};

#[tokio::test]
/// Expect unread counts and read-all to cover only the caller's rows
async fn read_all_marks_own_notifications() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let tenant = test.user().insert_tenant().await?;
    let other = test.user().insert_tenant().await?;
    test.notification().insert_notification(tenant.id, false).await?;
    test.notification().insert_notification(tenant.id, false).await?;
    test.notification().insert_notification(tenant.id, true).await?;
    test.notification().insert_notification(other.id, false).await?;
    let state = app_state(&test);
    sign_in(&test, &tenant).await;

    let count = unread_count(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(body_json(count).await["data"]["count"], 2);

    let marked = mark_all_read(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(body_json(marked).await["data"]["updated"], 2);

    let unread = list_notifications(
        State(state),
        test.session.clone(),
        Query(NotificationListQuery {
            unread_only: Some(true),
            page: None,
            limit: None,
        }),
    )
    .await
    .unwrap()
    .into_response();
    let body = body_json(unread).await;
    assert_eq!(body["pagination"]["total"], 0);

    Ok(())
}

#[tokio::test]
/// Expect 404 when touching another user's notification
async fn other_users_notification_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_all_tables().build().await?;
    let tenant = test.user().insert_tenant().await?;
    let other = test.user().insert_tenant().await?;
    let foreign = test.notification().insert_notification(other.id, false).await?;
    let state = app_state(&test);
    sign_in(&test, &tenant).await;

    let read = mark_read(State(state.clone()), test.session.clone(), Path(foreign.id)).await;
    let deleted = delete_notification(State(state), test.session.clone(), Path(foreign.id)).await;

    assert_eq!(
        read.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        deleted.err().unwrap().into_response().status(),
        StatusCode::NOT_FOUND
    );

    Ok(())
}
